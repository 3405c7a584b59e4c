use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::store::{Collection, DocumentFilter, DocumentStore};

/// Process-local document store. Used by tests and when no database is
/// configured; contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<(String, Value)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: Collection, filter: &DocumentFilter) -> Result<Vec<Value>, DatabaseError> {
        let collections = self.collections.read().await;
        let docs: Vec<Value> = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .rev()
                    .filter(|(_, doc)| filter.matches(doc))
                    .map(|(_, doc)| doc.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(docs)
    }

    async fn find_one(&self, collection: Collection, id: &str) -> Result<Option<Value>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|(key, _)| key == id))
            .map(|(_, doc)| doc.clone()))
    }

    async fn insert(&self, collection: Collection, id: &str, document: Value) -> Result<(), DatabaseError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        if docs.iter().any(|(key, _)| key == id) {
            return Err(DatabaseError::QueryError(format!(
                "duplicate id '{}' in {}",
                id,
                collection.table_name()
            )));
        }
        docs.push((id.to_string(), document));
        Ok(())
    }

    async fn replace(&self, collection: Collection, id: &str, document: Value) -> Result<bool, DatabaseError> {
        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|(key, _)| key == id));

        match slot {
            Some((_, doc)) => {
                *doc = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, DatabaseError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|(key, _)| key != id);
        Ok(docs.len() < before)
    }

    async fn delete_many(&self, collection: Collection, filter: &DocumentFilter) -> Result<u64, DatabaseError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|(_, doc)| !filter.matches(doc));
        Ok((before - docs.len()) as u64)
    }

    async fn ensure_collections(&self) -> Result<(), DatabaseError> {
        let mut collections = self.collections.write().await;
        for collection in Collection::ALL {
            collections.entry(collection).or_default();
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn lists_newest_first() {
        let store = MemoryStore::new();
        store.insert(Collection::Projects, "a", json!({"id": "a"})).await.unwrap();
        store.insert(Collection::Projects, "b", json!({"id": "b"})).await.unwrap();

        let docs = store.find(Collection::Projects, &DocumentFilter::new()).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn rejects_duplicate_ids() {
        let store = MemoryStore::new();
        store.insert(Collection::Forms, "f", json!({})).await.unwrap();
        assert!(store.insert(Collection::Forms, "f", json!({})).await.is_err());
    }

    #[tokio::test]
    async fn replace_and_delete_report_missing_ids() {
        let store = MemoryStore::new();
        assert!(!store.replace(Collection::Forms, "nope", json!({})).await.unwrap());
        assert!(!store.delete(Collection::Forms, "nope").await.unwrap());
    }

    #[tokio::test]
    async fn delete_many_only_touches_matches() {
        let store = MemoryStore::new();
        store.insert(Collection::ClientRequests, "1", json!({"form_id": "f1"})).await.unwrap();
        store.insert(Collection::ClientRequests, "2", json!({"form_id": "f2"})).await.unwrap();
        store.insert(Collection::ClientRequests, "3", json!({"form_id": "f1"})).await.unwrap();

        let removed = store
            .delete_many(Collection::ClientRequests, &DocumentFilter::new().eq("form_id", "f1"))
            .await
            .unwrap();
        assert_eq!(removed, 2);

        let left = store.find(Collection::ClientRequests, &DocumentFilter::new()).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0]["form_id"], "f2");
    }
}
