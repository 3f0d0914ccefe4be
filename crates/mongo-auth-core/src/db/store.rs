// Document store trait — the connection abstraction every backend implements.
//
// Stores are schema-agnostic: documents cross the boundary as JSON maps and
// the provider layer turns them into `GenericUser` views.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A stored document as a field → value map.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Name of the primary-key field in stored documents.
pub const ID_FIELD: &str = "_id";

// ─── Where Clause ────────────────────────────────────────────────

/// A single equality condition. A slice of clauses is combined with AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    /// The field name to filter on.
    pub field: String,
    /// The value the field must equal.
    pub value: serde_json::Value,
}

impl WhereClause {
    /// Simple equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether `doc` satisfies this clause.
    ///
    /// A missing field never matches, not even a `null` target.
    pub fn matches(&self, doc: &Document) -> bool {
        doc.get(&self.field).is_some_and(|v| v == &self.value)
    }
}

/// Whether `doc` satisfies every clause (an empty slice matches everything).
pub fn matches_all(doc: &Document, clauses: &[WhereClause]) -> bool {
    clauses.iter().all(|c| c.matches(doc))
}

// ─── Store Trait ─────────────────────────────────────────────────

/// Connection to a document store holding user collections.
///
/// Implementations must not retry, cache, or reinterpret driver failures;
/// errors are wrapped with [`AuthError::database`](crate::AuthError::database)
/// and returned as-is.
#[async_trait]
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Fetch the document whose primary key equals `id`.
    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Fetch the first document matching all clauses, in the store's natural order.
    async fn find_first(&self, collection: &str, clauses: &[WhereClause]) -> Result<Option<Document>>;

    /// Set a single field on the document with primary key `id`.
    ///
    /// Returns `false` when no document matched.
    async fn set_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<bool>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<S> {
    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        (**self).find_by_id(collection, id).await
    }

    async fn find_first(&self, collection: &str, clauses: &[WhereClause]) -> Result<Option<Document>> {
        (**self).find_first(collection, clauses).await
    }

    async fn set_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<bool> {
        (**self).set_field(collection, id, field, value).await
    }
}
