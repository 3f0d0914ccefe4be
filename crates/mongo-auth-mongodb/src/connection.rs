// MongoConnection — DocumentStore implementation over the official MongoDB driver.
//
// Collections are addressed by name on a single database. Driver errors are
// passed up unchanged; nothing here retries or caches.

use async_trait::async_trait;
use mongodb::{Client, Collection, Database};

use mongo_auth_core::db::store::{Document, DocumentStore, WhereClause};
use mongo_auth_core::error::{AuthError, Result};

use crate::query;

/// MongoDB connection.
///
/// Wraps a MongoDB `Database` handle; cloning is cheap and shares the
/// driver's connection pool.
#[derive(Debug, Clone)]
pub struct MongoConnection {
    db: Database,
}

impl MongoConnection {
    /// Create a connection from an existing database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Connect to a MongoDB URI and select `db_name`.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await.map_err(AuthError::database)?;
        tracing::info!(database = db_name, "connected to MongoDB");
        Ok(Self::new(client.database(db_name)))
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    fn collection(&self, name: &str) -> Collection<mongodb::bson::Document> {
        self.db.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoConnection {
    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let filter = query::id_filter(id);
        tracing::debug!("[Mongo] FIND_BY_ID on '{}'", collection);

        let result = self
            .collection(collection)
            .find_one(filter)
            .await
            .map_err(AuthError::database)?;

        Ok(result.map(|doc| query::doc_to_json(&doc)))
    }

    async fn find_first(&self, collection: &str, clauses: &[WhereClause]) -> Result<Option<Document>> {
        let filter = query::build_filter(clauses);
        tracing::debug!("[Mongo] FIND_FIRST on '{}' ({} filters)", collection, clauses.len());

        // No sort: the first document in the server's natural order wins.
        let result = self
            .collection(collection)
            .find_one(filter)
            .await
            .map_err(AuthError::database)?;

        Ok(result.map(|doc| query::doc_to_json(&doc)))
    }

    async fn set_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<bool> {
        let filter = query::id_filter(id);
        let update = query::build_set_doc(field, &value);
        tracing::debug!("[Mongo] SET '{}' on '{}'", field, collection);

        let result = self
            .collection(collection)
            .update_one(filter, update)
            .await
            .map_err(AuthError::database)?;

        Ok(result.matched_count > 0)
    }
}
