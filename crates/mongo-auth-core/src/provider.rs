// User provider — the lookup/validation contract the authentication framework
// calls, and its implementation over any `DocumentStore`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{FieldMapping, ProviderConfig};
use crate::credentials::Credentials;
use crate::crypto::{constant_time_equal, legacy_hash, PasswordHasher};
use crate::db::models::{Authenticatable, GenericUser};
use crate::db::store::{Document, DocumentStore};
use crate::error::{AuthError, Result};

// ─── Provider Trait ──────────────────────────────────────────────

/// Capability contract expected by the host authentication framework.
///
/// Absence is a normal outcome: lookups return `Ok(None)` when nothing matches.
#[async_trait]
pub trait UserProvider: Send + Sync {
    type User: Authenticatable + Send + Sync;

    /// Retrieve a user by primary key.
    async fn retrieve_by_id(&self, identifier: &str) -> Result<Option<Self::User>>;

    /// Retrieve the first user matching the non-password credentials.
    async fn retrieve_by_credentials(&self, credentials: &Credentials) -> Result<Option<Self::User>>;

    /// Check the submitted password against the user's stored hash.
    fn validate_credentials(&self, user: &Self::User, credentials: &Credentials) -> Result<bool>;

    /// Retrieve a user by primary key and "remember me" token.
    async fn retrieve_by_token(&self, identifier: &str, token: &str) -> Result<Option<Self::User>>;

    /// Store a new "remember me" token for the user.
    async fn update_remember_token(&self, user: &mut Self::User, token: &str) -> Result<()>;
}

// ─── Document-backed Provider ────────────────────────────────────

/// User provider reading a single collection of a [`DocumentStore`].
///
/// The hasher is held for callers that need it (registration, rehashing) but
/// validation always uses the legacy `crypt(sha1(plain), salt)` scheme so that
/// existing hashes keep working.
pub struct DocumentUserProvider<S> {
    connection: S,
    hasher: Arc<dyn PasswordHasher>,
    config: ProviderConfig,
}

impl<S: fmt::Debug> fmt::Debug for DocumentUserProvider<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentUserProvider")
            .field("connection", &self.connection)
            .field("hasher", &self.hasher)
            .field("collection", &self.config.collection)
            .finish()
    }
}

impl<S: DocumentStore> DocumentUserProvider<S> {
    /// Create a provider over `collection` with the legacy field names.
    pub fn new(connection: S, hasher: Arc<dyn PasswordHasher>, collection: impl Into<String>) -> Self {
        Self {
            connection,
            hasher,
            config: ProviderConfig::new(collection),
        }
    }

    /// Create a provider from a full configuration.
    pub fn with_config(
        connection: S,
        hasher: Arc<dyn PasswordHasher>,
        config: ProviderConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            connection,
            hasher,
            config,
        })
    }

    pub fn connection(&self) -> &S {
        &self.connection
    }

    pub fn hasher(&self) -> &Arc<dyn PasswordHasher> {
        &self.hasher
    }

    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    pub fn fields(&self) -> &FieldMapping {
        &self.config.fields
    }

    fn view(&self, doc: Document) -> Result<GenericUser> {
        GenericUser::from_document(doc, self.config.fields.remember_token.as_str())
    }
}

#[async_trait]
impl<S: DocumentStore> UserProvider for DocumentUserProvider<S> {
    type User = GenericUser;

    async fn retrieve_by_id(&self, identifier: &str) -> Result<Option<GenericUser>> {
        let found = self
            .connection
            .find_by_id(&self.config.collection, identifier)
            .await?;

        tracing::debug!(
            collection = %self.config.collection,
            found = found.is_some(),
            "retrieve_by_id"
        );

        found.map(|doc| self.view(doc)).transpose()
    }

    async fn retrieve_by_credentials(&self, credentials: &Credentials) -> Result<Option<GenericUser>> {
        let fields = &self.config.fields;
        let clauses = credentials.query_clauses(fields);

        let found = self
            .connection
            .find_first(&self.config.collection, &clauses)
            .await?;

        tracing::debug!(
            collection = %self.config.collection,
            filters = clauses.len(),
            found = found.is_some(),
            "retrieve_by_credentials"
        );

        let Some(doc) = found else {
            return Ok(None);
        };

        let user = self.view(doc)?;
        let password = user.require_str(&fields.password)?.to_string();
        Ok(Some(user.with_password(password)))
    }

    fn validate_credentials(&self, user: &GenericUser, credentials: &Credentials) -> Result<bool> {
        let fields = &self.config.fields;
        let plain = credentials.plaintext_password(fields)?;
        let salt = user.require_str(&fields.password_salt)?;
        let stored = user
            .auth_password()
            .ok_or_else(|| AuthError::missing_field("password"))?;

        let hash = legacy_hash(plain, salt)?;
        let valid = constant_time_equal(hash.as_bytes(), stored.as_bytes());

        tracing::debug!(user_id = %user.id, valid, "validate_credentials");
        Ok(valid)
    }

    async fn retrieve_by_token(&self, identifier: &str, token: &str) -> Result<Option<GenericUser>> {
        let Some(user) = self.retrieve_by_id(identifier).await? else {
            return Ok(None);
        };

        let matched = user
            .remember_token()
            .is_some_and(|stored| constant_time_equal(stored.as_bytes(), token.as_bytes()));

        tracing::debug!(user_id = %user.id, matched, "retrieve_by_token");
        Ok(matched.then_some(user))
    }

    async fn update_remember_token(&self, user: &mut GenericUser, token: &str) -> Result<()> {
        user.set_remember_token(token);

        let matched = self
            .connection
            .set_field(
                &self.config.collection,
                &user.id,
                user.remember_token_name(),
                token.into(),
            )
            .await?;

        tracing::debug!(user_id = %user.id, matched, "update_remember_token");

        if matched {
            Ok(())
        } else {
            Err(AuthError::NotPersisted(user.id.clone()))
        }
    }
}
