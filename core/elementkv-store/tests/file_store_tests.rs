use elementkv_store::{FileStore, FileStoreConfig, KeyValueStore, StoreError};
use std::sync::Arc;
use tempfile::TempDir;

async fn open(temp: &TempDir) -> FileStore {
    FileStore::open(FileStoreConfig {
        root: temp.path().join("store"),
        ..Default::default()
    })
    .await
    .unwrap()
}

// ── Config defaults ─────────────────────────────────────────────

#[test]
fn file_store_config_default() {
    let cfg = FileStoreConfig::default();
    assert_eq!(cfg.root, std::path::PathBuf::from(".elementkv"));
    assert_eq!(cfg.extension, "json");
}

#[test]
fn file_store_config_serde() {
    let cfg = FileStoreConfig::default();
    let json = serde_json::to_string(&cfg).unwrap();
    let back: FileStoreConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);
}

// ── Lifecycle ───────────────────────────────────────────────────

#[tokio::test]
async fn open_creates_root_directory() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp).await;
    assert!(store.root().is_dir());
    assert_eq!(store.backend_name(), "file");
}

#[tokio::test]
async fn store_retrieve_delete() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp).await;

    assert_eq!(store.retrieve("candidate_alice").await.unwrap(), None);

    store.store("candidate_alice", r#"{"votes":3}"#).await.unwrap();
    assert_eq!(
        store.retrieve("candidate_alice").await.unwrap().as_deref(),
        Some(r#"{"votes":3}"#)
    );
    assert!(store.path_for("candidate_alice").unwrap().is_file());

    store.delete("candidate_alice").await.unwrap();
    assert_eq!(store.retrieve("candidate_alice").await.unwrap(), None);
    // Second delete of an absent key succeeds.
    store.delete("candidate_alice").await.unwrap();
}

#[tokio::test]
async fn keys_with_separators_stay_inside_root() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp).await;

    store.store("../escape", "x").await.unwrap();
    let path = store.path_for("../escape").unwrap();
    assert_eq!(path.parent().unwrap(), store.root());
    assert_eq!(store.retrieve("../escape").await.unwrap().as_deref(), Some("x"));
}

#[tokio::test]
async fn no_temp_files_left_after_store() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp).await;
    store.store("k", "v").await.unwrap();

    let names: Vec<String> = std::fs::read_dir(store.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["k.json".to_string()]);
}

// ── Concurrent writers ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writes_to_one_key_all_succeed() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(open(&temp).await);

    for round in 0..100 {
        let first = format!(r#"{{"round":{round},"writer":1}}"#);
        let second = format!(r#"{{"round":{round},"writer":2}}"#);
        let a = tokio::spawn({
            let store = store.clone();
            let value = first.clone();
            async move { store.store("k", &value).await }
        });
        let b = tokio::spawn({
            let store = store.clone();
            let value = second.clone();
            async move { store.store("k", &value).await }
        });
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        // Last writer wins; the value is never torn.
        let stored = store.retrieve("k").await.unwrap().unwrap();
        assert!(stored == first || stored == second, "round {round}: {stored}");
    }

    let names: Vec<String> = std::fs::read_dir(store.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["k.json".to_string()]);
}

#[tokio::test]
async fn failed_write_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp).await;
    // A directory in place of the key file makes the rename fail.
    std::fs::create_dir(store.path_for("k").unwrap()).unwrap();
    std::fs::write(store.path_for("k").unwrap().join("child"), "x").unwrap();

    let err = store.store("k", "v").await.unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));

    let names: Vec<String> = std::fs::read_dir(store.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["k.json".to_string()]);
}

#[tokio::test]
async fn reopen_sees_previous_values() {
    let temp = TempDir::new().unwrap();
    open(&temp).await.store("k", "v").await.unwrap();
    let reopened = open(&temp).await;
    assert_eq!(reopened.retrieve("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn empty_key_is_invalid() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp).await;
    let err = store.store("", "v").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidKey(_)));
}
