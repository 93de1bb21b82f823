// src/core/storage/mod.rs
pub mod memory;

pub use memory::MemoryStore;

use crate::error::CapsuleError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Collection names used by the document database.
pub mod collections {
    pub const USERS: &str = "users";
    pub const CAPSULES: &str = "capsules";
    pub const CONTENT: &str = "content";
    pub const SYSTEM: &str = "system";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const ANALYTICS: &str = "analytics";
}

/// The document database, consumed as a black box: JSON documents addressed
/// by collection name and document id. The managed provider implements this
/// behind a network client; [`MemoryStore`] implements it in-process for
/// tests and development seeding.
pub trait DocumentStore {
    /// Inserts or replaces a document, returning the previous version if any.
    fn insert(&self, collection: &str, id: &str, doc: Value)
        -> Result<Option<Value>, CapsuleError>;

    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, CapsuleError>;

    /// Shallow-merges `patch` fields into an existing document.
    fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<(), CapsuleError>;

    fn remove(&self, collection: &str, id: &str) -> Result<Option<Value>, CapsuleError>;

    /// All documents in a collection as `(id, doc)` pairs.
    fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, CapsuleError>;
}

/// Reads a document and deserializes it into `T`.
pub fn get_typed<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, CapsuleError> {
    match store.get(collection, id)? {
        Some(doc) => serde_json::from_value(doc)
            .map(Some)
            .map_err(|e| CapsuleError::StorageError(format!("malformed {collection} document: {e}"))),
        None => Ok(None),
    }
}

/// Serializes `value` and writes it as a full document.
pub fn put_typed<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    value: &T,
) -> Result<Option<Value>, CapsuleError> {
    let doc = serde_json::to_value(value)
        .map_err(|e| CapsuleError::StorageError(format!("failed to serialize document: {e}")))?;
    store.insert(collection, id, doc)
}

/// Deserializes every document in a collection, skipping none: a malformed
/// document is a storage error, not silently dropped.
pub fn list_typed<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
) -> Result<Vec<(String, T)>, CapsuleError> {
    store
        .list(collection)?
        .into_iter()
        .map(|(id, doc)| {
            serde_json::from_value(doc)
                .map(|value| (id.clone(), value))
                .map_err(|e| {
                    CapsuleError::StorageError(format!(
                        "malformed {collection} document {id}: {e}"
                    ))
                })
        })
        .collect()
}
