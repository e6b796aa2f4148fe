use crate::error::{ElementError, ElementResult};
use crate::schema::{Described, ElementSchema};
use elementkv_store::{KeyValueStore, SharedStore};
use elementkv_types::{ElementId, State, merge_shallow};
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// An object whose state is mirrored to a key-value store.
///
/// The element keeps an in-memory copy of its state. Reads refresh that copy
/// from the store (load-replace); writes merge a patch into it and store the
/// full result (merge-write). Nothing is locked or versioned: the last write
/// to a key wins, and a read-then-write sequence is not atomic.
pub struct Element {
    id: ElementId,
    state: State,
    store: SharedStore,
}

impl Element {
    /// Creates an element in memory. No I/O is performed.
    ///
    /// Fails with [`ElementError::InvalidIdentifier`] when `id` is empty.
    pub fn new(
        store: SharedStore,
        id: impl Into<String>,
        initial_state: State,
    ) -> ElementResult<Self> {
        Ok(Self::with_id(store, ElementId::new(id)?, initial_state))
    }

    /// Creates an element from an already validated identifier.
    pub fn with_id(store: SharedStore, id: ElementId, initial_state: State) -> Self {
        Self {
            id,
            state: initial_state,
            store,
        }
    }

    /// Creates an element under a freshly generated identifier.
    pub fn with_generated_id(store: SharedStore, initial_state: State) -> Self {
        Self::with_id(store, ElementId::generate(), initial_state)
    }

    pub fn identifier(&self) -> &ElementId {
        &self.id
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Merges `patch` into the in-memory state and stores the full result.
    ///
    /// The merge is kept even when the write fails; in that case the element
    /// is ahead of the store until a later save succeeds.
    pub async fn merge_and_save(&mut self, patch: State) -> ElementResult<()> {
        merge_shallow(&mut self.state, patch);
        self.save_state().await
    }

    /// Alias of [`Element::merge_and_save`].
    pub async fn update_data(&mut self, patch: State) -> ElementResult<()> {
        self.merge_and_save(patch).await
    }

    /// Alias of [`Element::merge_and_save`], matching the accessor naming of
    /// derived elements.
    pub async fn update(&mut self, patch: State) -> ElementResult<()> {
        self.merge_and_save(patch).await
    }

    /// Reloads state from the store and returns it.
    ///
    /// An absent key leaves the in-memory state untouched.
    pub async fn refresh_and_get(&mut self) -> ElementResult<&State> {
        self.load_state().await?;
        Ok(&self.state)
    }

    /// Alias of [`Element::refresh_and_get`].
    pub async fn get_state(&mut self) -> ElementResult<&State> {
        self.refresh_and_get().await
    }

    /// Stores the current in-memory state as-is.
    pub async fn save_state(&self) -> ElementResult<()> {
        let encoded = serde_json::to_string(&self.state).map_err(ElementError::Encode)?;
        debug!(key = %self.id, bytes = encoded.len(), "saving element state");
        self.store
            .store(self.id.as_str(), &encoded)
            .await
            .map_err(|source| ElementError::StorageWrite {
                key: self.id.to_string(),
                source,
            })
    }

    /// Replaces the in-memory state with the stored value, if there is one.
    ///
    /// Empty stored text counts as absent. Anything else that is not a JSON
    /// object fails with [`ElementError::Decode`] and leaves state untouched.
    pub async fn load_state(&mut self) -> ElementResult<()> {
        let stored = self
            .store
            .retrieve(self.id.as_str())
            .await
            .map_err(|source| ElementError::StorageRead {
                key: self.id.to_string(),
                source,
            })?;

        match stored {
            Some(text) if !text.is_empty() => {
                let state: State =
                    serde_json::from_str(&text).map_err(|source| ElementError::Decode {
                        key: self.id.to_string(),
                        source,
                    })?;
                debug!(key = %self.id, fields = state.len(), "loaded element state");
                self.state = state;
            }
            _ => debug!(key = %self.id, "no stored state, keeping in-memory copy"),
        }
        Ok(())
    }

    /// Returns the in-memory state without touching the store.
    pub fn to_plain_value(&self) -> &State {
        &self.state
    }

    /// Refreshes state and deserializes a single field.
    ///
    /// Returns `Ok(None)` when the field is missing.
    pub async fn field<T: DeserializeOwned>(&mut self, name: &str) -> ElementResult<Option<T>> {
        self.load_state().await?;
        self.state
            .get(name)
            .map(|value| {
                T::deserialize(value).map_err(|e| ElementError::InvalidField {
                    field: name.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    /// Merges and saves a single field.
    pub async fn set_field(&mut self, name: &str, value: impl Serialize) -> ElementResult<()> {
        let value = serde_json::to_value(value).map_err(ElementError::Encode)?;
        let mut patch = State::new();
        patch.insert(name.to_string(), value);
        self.merge_and_save(patch).await
    }

    /// Extract a string value from the in-memory state using a JSON pointer
    /// (e.g., "/title").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.pointer(pointer).and_then(Value::as_str)
    }

    /// Extract a boolean value from the in-memory state using a JSON pointer.
    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.pointer(pointer).and_then(Value::as_bool)
    }

    /// Extract a numeric value from the in-memory state using a JSON pointer.
    pub fn get_number(&self, pointer: &str) -> Option<f64> {
        self.pointer(pointer).and_then(Value::as_f64)
    }

    fn pointer(&self, pointer: &str) -> Option<&Value> {
        let path = pointer.strip_prefix('/')?;
        let (head, tail) = match path.split_once('/') {
            Some((head, tail)) => (head, Some(tail)),
            None => (path, None),
        };
        let root = self.state.get(&head.replace("~1", "/").replace("~0", "~"))?;
        match tail {
            Some(tail) => root.pointer(&format!("/{tail}")),
            None => Some(root),
        }
    }

    /// Encodes the description of the base element type.
    ///
    /// This always describes `Element`, whatever type wraps the instance; use
    /// [`crate::describe`] for a derived type's own schema.
    pub fn encode_description(&self) -> ElementResult<String> {
        Self::SCHEMA.to_metadata().encode()
    }
}

impl Described for Element {
    const SCHEMA: ElementSchema = ElementSchema::new(
        "Element",
        &["identifier", "state"],
        &[
            "merge_and_save",
            "update_data",
            "update",
            "refresh_and_get",
            "get_state",
            "save_state",
            "load_state",
            "to_plain_value",
            "encode_description",
        ],
    );
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("store", &self.store.backend_name())
            .finish()
    }
}

/// Serializes as the in-memory state, so an element can be embedded in a
/// larger JSON document.
impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.state.serialize(serializer)
    }
}
