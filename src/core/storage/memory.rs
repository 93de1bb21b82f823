// src/core/storage/memory.rs
use crate::error::CapsuleError;
use crate::storage::DocumentStore;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// In-process document store: one ordered map per collection. Used by tests
/// and development seeding; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn with_collections<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, BTreeMap<String, Value>>) -> R,
    ) -> Result<R, CapsuleError> {
        let mut guard = self
            .collections
            .lock()
            .map_err(|_| CapsuleError::StorageError("store mutex poisoned".to_string()))?;
        Ok(f(&mut guard))
    }
}

impl DocumentStore for MemoryStore {
    fn insert(
        &self,
        collection: &str,
        id: &str,
        doc: Value,
    ) -> Result<Option<Value>, CapsuleError> {
        self.with_collections(|collections| {
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), doc)
        })
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, CapsuleError> {
        self.with_collections(|collections| {
            collections
                .get(collection)
                .and_then(|docs| docs.get(id))
                .cloned()
        })
    }

    fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<(), CapsuleError> {
        self.with_collections(|collections| {
            let doc = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| {
                    CapsuleError::StorageError(format!("no document {collection}/{id} to update"))
                })?;
            let fields = doc.as_object_mut().ok_or_else(|| {
                CapsuleError::StorageError(format!("document {collection}/{id} is not an object"))
            })?;
            for (key, value) in patch {
                fields.insert(key, value);
            }
            Ok(())
        })?
    }

    fn remove(&self, collection: &str, id: &str) -> Result<Option<Value>, CapsuleError> {
        self.with_collections(|collections| {
            collections
                .get_mut(collection)
                .and_then(|docs| docs.remove(id))
        })
    }

    fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, CapsuleError> {
        self.with_collections(|collections| {
            collections
                .get(collection)
                .map(|docs| {
                    docs.iter()
                        .map(|(id, doc)| (id.clone(), doc.clone()))
                        .collect()
                })
                .unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_get_remove_roundtrip() {
        let store = MemoryStore::new();
        let prev = store
            .insert("capsules", "c-1", json!({"title": "Hello"}))
            .unwrap();
        assert!(prev.is_none());

        let doc = store.get("capsules", "c-1").unwrap().unwrap();
        assert_eq!(doc["title"], "Hello");

        let removed = store.remove("capsules", "c-1").unwrap();
        assert!(removed.is_some());
        assert!(store.get("capsules", "c-1").unwrap().is_none());
    }

    #[test]
    fn insert_returns_previous_document() {
        let store = MemoryStore::new();
        store.insert("users", "u-1", json!({"name": "a"})).unwrap();
        let prev = store
            .insert("users", "u-1", json!({"name": "b"}))
            .unwrap()
            .unwrap();
        assert_eq!(prev["name"], "a");
    }

    #[test]
    fn update_merges_shallow_fields() {
        let store = MemoryStore::new();
        store
            .insert("capsules", "c-1", json!({"title": "Hello", "contentCount": 0}))
            .unwrap();

        let mut patch = Map::new();
        patch.insert("contentCount".to_string(), json!(3));
        store.update("capsules", "c-1", patch).unwrap();

        let doc = store.get("capsules", "c-1").unwrap().unwrap();
        assert_eq!(doc["title"], "Hello");
        assert_eq!(doc["contentCount"], 3);
    }

    #[test]
    fn update_missing_document_errors() {
        let store = MemoryStore::new();
        let err = store.update("capsules", "nope", Map::new()).unwrap_err();
        assert!(matches!(err, CapsuleError::StorageError(_)));
    }

    #[test]
    fn list_returns_all_documents_in_id_order() {
        let store = MemoryStore::new();
        store.insert("content", "b", json!({"order": 2})).unwrap();
        store.insert("content", "a", json!({"order": 1})).unwrap();

        let docs = store.list("content").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].0, "a");
        assert!(store.list("empty").unwrap().is_empty());
    }
}
