use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use super::manager::DatabaseError;
use super::store::{Collection, DocumentFilter, DocumentStore};

/// A record shape persisted in one collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;
    /// Human-readable name used in error messages
    const LABEL: &'static str;

    fn id(&self) -> &str;
}

/// Typed access to one collection of the document store
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_any(&self, filter: &DocumentFilter) -> Result<Vec<T>, DatabaseError> {
        self.store
            .find(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(DatabaseError::from))
            .collect()
    }

    pub async fn select_one(&self, id: &str) -> Result<Option<T>, DatabaseError> {
        match self.store.find_one(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn select_404(&self, id: &str) -> Result<T, DatabaseError> {
        self.select_one(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} '{}' not found", T::LABEL, id)))
    }

    pub async fn insert(&self, record: &T) -> Result<(), DatabaseError> {
        let doc = serde_json::to_value(record)?;
        self.store.insert(T::COLLECTION, record.id(), doc).await
    }

    pub async fn update(&self, record: &T) -> Result<(), DatabaseError> {
        let doc = serde_json::to_value(record)?;
        if self.store.replace(T::COLLECTION, record.id(), doc).await? {
            Ok(())
        } else {
            Err(DatabaseError::NotFound(format!("{} '{}' not found", T::LABEL, record.id())))
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        if self.store.delete(T::COLLECTION, id).await? {
            Ok(())
        } else {
            Err(DatabaseError::NotFound(format!("{} '{}' not found", T::LABEL, id)))
        }
    }

    pub async fn delete_where(&self, filter: &DocumentFilter) -> Result<u64, DatabaseError> {
        self.store.delete_many(T::COLLECTION, filter).await
    }
}
