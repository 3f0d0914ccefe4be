// mongo-auth-mongodb — MongoDB backend for mongo-auth user providers.
//
// Provides a `DocumentStore` over the official MongoDB Rust driver and a
// ready-made provider type bound to it.

pub mod connection;
pub mod query;

use std::sync::Arc;

use mongo_auth_core::{ConnectionConfig, DocumentUserProvider, PasswordHasher, ProviderConfig, Result};

pub use connection::MongoConnection;

/// User provider reading a MongoDB collection.
pub type MongoUserProvider = DocumentUserProvider<MongoConnection>;

/// Connect to MongoDB and build a provider over the configured collection.
pub async fn connect_provider(
    connection: &ConnectionConfig,
    provider: &ProviderConfig,
    hasher: Arc<dyn PasswordHasher>,
) -> Result<MongoUserProvider> {
    provider.validate()?;
    let conn = MongoConnection::connect(&connection.uri, &connection.database).await?;
    DocumentUserProvider::with_config(conn, hasher, provider.clone())
}

/// Same as [`connect_provider`], reading both configs from the environment.
pub async fn connect_provider_from_env(hasher: Arc<dyn PasswordHasher>) -> Result<MongoUserProvider> {
    connect_provider(&ConnectionConfig::from_env(), &ProviderConfig::from_env(), hasher).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongo_auth_core::{AuthError, LegacyCryptHasher};

    #[tokio::test]
    async fn test_connect_provider_rejects_bad_config() {
        let result = connect_provider(
            &ConnectionConfig::default(),
            &ProviderConfig::new(""),
            Arc::new(LegacyCryptHasher),
        )
        .await;
        assert!(matches!(result, Err(AuthError::Config(_))));
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_uri() {
        let err = MongoConnection::connect("not-a-mongodb-uri", "app").await.unwrap_err();
        assert!(matches!(err, AuthError::Database(_)));
    }
}
