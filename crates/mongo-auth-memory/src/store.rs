// In-memory document store — HashMap of collections implementing `DocumentStore`.
//
// Documents are kept in insertion order, which is the store's natural order for
// `find_first`. Thread-safe via `tokio::sync::RwLock`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use mongo_auth_core::db::models::stringify_id;
use mongo_auth_core::db::store::{matches_all, Document, DocumentStore, WhereClause, ID_FIELD};
use mongo_auth_core::error::Result;

/// Collection name → documents.
type Store = HashMap<String, Vec<Document>>;

/// In-memory document store.
///
/// All data is stored in a `HashMap` wrapped in an `Arc<RwLock<...>>`; clones
/// share the same data. Data is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    store: Arc<RwLock<Store>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with data.
    pub fn with_data(data: Store) -> Self {
        Self {
            store: Arc::new(RwLock::new(data)),
        }
    }

    /// Append a document, generating a UUID `_id` when it has none.
    ///
    /// Returns the stored document.
    pub async fn insert(&self, collection: &str, mut doc: Document) -> Document {
        if doc.get(ID_FIELD).map_or(true, |v| v.is_null()) {
            doc.insert(ID_FIELD.to_string(), uuid::Uuid::new_v4().to_string().into());
        }

        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());

        doc
    }

    /// Get a snapshot of all data (for debugging/testing).
    pub async fn snapshot(&self) -> Store {
        self.store.read().await.clone()
    }

    /// Clear all data.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    /// Number of documents in a collection.
    pub async fn collection_count(&self, collection: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection)
            .map(|v| v.len())
            .unwrap_or(0)
    }
}

fn has_id(doc: &Document, id: &str) -> bool {
    doc.get(ID_FIELD).is_some_and(|v| stringify_id(v) == id)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let store = self.store.read().await;
        let found = store
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| has_id(d, id)))
            .cloned();

        tracing::debug!("[Memory Store] FIND_BY_ID on '{}'", collection);
        Ok(found)
    }

    async fn find_first(&self, collection: &str, clauses: &[WhereClause]) -> Result<Option<Document>> {
        let store = self.store.read().await;
        let found = store
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| matches_all(d, clauses)))
            .cloned();

        tracing::debug!("[Memory Store] FIND_FIRST on '{}' ({} filters)", collection, clauses.len());
        Ok(found)
    }

    async fn set_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<bool> {
        let mut store = self.store.write().await;
        let record = store
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_id(d, id)));

        tracing::debug!("[Memory Store] SET '{}' on '{}'", field, collection);

        match record {
            Some(doc) => {
                doc.insert(field.to_string(), value);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
