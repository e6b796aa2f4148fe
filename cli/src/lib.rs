//! Commands behind the `elementkv` binary.
//!
//! Each command runs against an injected [`SharedStore`] and returns the
//! text to print, so the binary stays a thin shell around [`run`].

use anyhow::{Context, Result, bail};
use clap::{Subcommand, ValueEnum};
use elementkv_model::scaffold::{TypeDefinition, synthesize_type};
use elementkv_model::{Element, SharedStore, State, TypeRegistry, VotingCandidate};
use elementkv_store::{FileStore, FileStoreConfig, KeyValueStore, TimeoutStore};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print an element's stored state
    Get {
        /// Element identifier
        id: String,
    },
    /// Merge a JSON object into an element's state and save it
    Set {
        /// Element identifier
        id: String,
        /// JSON object with the fields to write
        patch: String,
    },
    /// Delete an element's stored state
    Remove {
        /// Element identifier
        id: String,
    },
    /// Add one vote to a candidate and print the new count
    Vote {
        /// Candidate name (stored as `candidate_<name>`)
        name: String,
    },
    /// Print the JSON description of an element type
    Describe {
        #[arg(value_enum, default_value = "element")]
        kind: ElementKind,
    },
    /// Print skeleton Rust source for a JSON type definition
    Scaffold {
        /// File holding `{"className"?, "properties": [...], "methods": [...]}`
        definition: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Element,
    VotingCandidate,
}

impl ElementKind {
    fn class_name(self) -> &'static str {
        match self {
            Self::Element => "Element",
            Self::VotingCandidate => "VotingCandidate",
        }
    }
}

/// Opens the directory-backed store, wrapped with a per-call deadline.
pub async fn open_store(root: PathBuf, timeout: Duration) -> Result<SharedStore> {
    let store = FileStore::open(FileStoreConfig {
        root,
        ..Default::default()
    })
    .await
    .context("failed to open store directory")?;
    info!("Using store at {:?}", store.root());
    Ok(Arc::new(TimeoutStore::new(store, timeout)))
}

/// Runs `command` and returns its output.
pub async fn run(store: SharedStore, command: Command) -> Result<String> {
    match command {
        Command::Get { id } => {
            let mut element = Element::new(store, id, State::new())?;
            let state = element.refresh_and_get().await?;
            Ok(serde_json::to_string_pretty(state)?)
        }
        Command::Set { id, patch } => {
            let patch = match serde_json::from_str::<Value>(&patch)
                .context("patch is not valid JSON")?
            {
                Value::Object(map) => map,
                other => bail!("patch must be a JSON object, got {other}"),
            };
            let mut element = Element::new(store, id, State::new())?;
            element.load_state().await?;
            element.merge_and_save(patch).await?;
            Ok(serde_json::to_string_pretty(element.to_plain_value())?)
        }
        Command::Remove { id } => {
            let element = Element::new(store, id, State::new())?;
            element
                .store()
                .delete(element.identifier().as_str())
                .await
                .with_context(|| format!("failed to delete {}", element.identifier()))?;
            Ok(format!("removed {}", element.identifier()))
        }
        Command::Vote { name } => {
            let mut candidate = VotingCandidate::new(store, name)?;
            let votes = candidate.increment().await?;
            Ok(format!("{}: {votes}", candidate.name()))
        }
        Command::Describe { kind } => {
            let metadata = TypeRegistry::with_builtin().describe(kind.class_name())?;
            Ok(metadata.encode()?)
        }
        Command::Scaffold { definition } => {
            let text = tokio::fs::read_to_string(&definition)
                .await
                .with_context(|| format!("failed to read {}", definition.display()))?;
            let definition = TypeDefinition::decode(&text)?;
            Ok(synthesize_type(&definition)?)
        }
    }
}
