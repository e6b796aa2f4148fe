//! Directory-backed store.
//!
//! Each key is kept in its own file under a root directory. Writes go to a
//! sibling temp file first and are renamed into place, so a reader sees either
//! the previous value or the new one, never a torn write. Every write gets its
//! own temp file, so concurrent writers to one key never share one; the last
//! rename wins.

use crate::error::{StoreError, StoreResult};
use crate::KeyValueStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Configuration for a [`FileStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStoreConfig {
    /// Directory holding one file per key.
    pub root: PathBuf,
    /// File extension appended to every key file.
    pub extension: String,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".elementkv"),
            extension: "json".to_string(),
        }
    }
}

/// Store that maps each key to a file under [`FileStoreConfig::root`].
#[derive(Debug, Clone)]
pub struct FileStore {
    config: FileStoreConfig,
}

impl FileStore {
    /// Opens a store rooted at `config.root`, creating the directory if needed.
    pub async fn open(config: FileStoreConfig) -> StoreResult<Self> {
        if !fs::try_exists(&config.root).await? {
            fs::create_dir_all(&config.root).await?;
            info!("Created store directory: {:?}", config.root);
        }
        Ok(Self { config })
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Returns the file a key is stored in.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let name = key_to_file_name(key)?;
        Ok(self
            .config
            .root
            .join(format!("{name}.{}", self.config.extension)))
    }

    /// Returns a fresh temp path for one write to `key`.
    ///
    /// Key files never start with a dot, so temp names cannot collide with them.
    fn temp_path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let name = key_to_file_name(key)?;
        Ok(self
            .config
            .root
            .join(format!(".{name}.{}.tmp", Uuid::new_v4().simple())))
    }
}

/// Escapes a key into a single path component.
///
/// Percent-encoding leaves only `[A-Za-z0-9-_.~]`, so separators cannot reach
/// the file system; a leading dot is escaped as well to keep `.`/`..` and
/// hidden files out.
fn key_to_file_name(key: &str) -> StoreResult<String> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey("key must not be empty".to_string()));
    }
    let encoded = urlencoding::encode(key);
    Ok(match encoded.strip_prefix('.') {
        Some(rest) => format!("%2E{rest}"),
        None => encoded.into_owned(),
    })
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    async fn retrieve(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let tmp = self.temp_path_for(key)?;
        let written = match fs::write(&tmp, value).await {
            Ok(()) => fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp).await
                && cleanup.kind() != ErrorKind::NotFound
            {
                warn!("Failed to remove temp file {:?}: {}", tmp, cleanup);
            }
            return Err(e.into());
        }
        debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
