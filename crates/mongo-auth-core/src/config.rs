// Provider configuration — collection name plus the record/credential field mapping.
//
// The defaults reproduce the legacy hardcoded names (`Password`, `PasswordSalt`,
// substring exclusion on "Password"), so an empty config behaves exactly like
// the historical provider.

use serde::{Deserialize, Serialize};

use crate::env;
use crate::error::{AuthError, Result};

/// Default collection holding user documents.
pub const DEFAULT_COLLECTION: &str = "users";
/// Default MongoDB connection string.
pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
/// Default database name.
pub const DEFAULT_DATABASE: &str = "app";

/// Names of the record attributes and credential keys the provider relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldMapping {
    /// Stored hash attribute, copied into the view's `password`.
    pub password: String,
    /// Stored salt attribute.
    pub password_salt: String,
    /// Credential key carrying the submitted plaintext.
    pub credential_password: String,
    /// Credential keys containing this substring are never used as query filters.
    pub excluded_marker: String,
    /// Attribute holding the "remember me" token.
    pub remember_token: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            password: "Password".into(),
            password_salt: "PasswordSalt".into(),
            credential_password: "Password".into(),
            excluded_marker: "Password".into(),
            remember_token: "remember_token".into(),
        }
    }
}

impl FieldMapping {
    /// Whether a credential key takes part in the lookup query.
    ///
    /// Case-sensitive substring match: with the defaults, `UserPassword` and
    /// `Password` are excluded while `password` is not.
    #[inline]
    pub fn is_queryable(&self, key: &str) -> bool {
        !key.contains(self.excluded_marker.as_str())
    }
}

/// Configuration of a document-backed user provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Collection containing the user documents.
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default)]
    pub fields: FieldMapping,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION)
    }
}

impl ProviderConfig {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            fields: FieldMapping::default(),
        }
    }

    /// Replace the field mapping.
    pub fn with_fields(mut self, fields: FieldMapping) -> Self {
        self.fields = fields;
        self
    }

    /// Build from `MONGO_AUTH_COLLECTION`, falling back to the default collection.
    pub fn from_env() -> Self {
        Self::new(env::collection_from_env().unwrap_or_else(default_collection))
    }

    /// Reject configurations that could never match a document.
    pub fn validate(&self) -> Result<()> {
        if self.collection.trim().is_empty() {
            return Err(AuthError::Config("collection name must not be empty".into()));
        }

        let f = &self.fields;
        let named = [
            ("password", &f.password),
            ("passwordSalt", &f.password_salt),
            ("credentialPassword", &f.credential_password),
            ("excludedMarker", &f.excluded_marker),
            ("rememberToken", &f.remember_token),
        ];
        for (key, value) in named {
            if value.is_empty() {
                return Err(AuthError::Config(format!("field mapping `{key}` must not be empty")));
            }
        }

        Ok(())
    }
}

/// Where to reach the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    pub uri: String,
    pub database: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl ConnectionConfig {
    /// Build from `MONGO_AUTH_URI` / `MONGO_AUTH_DATABASE`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            uri: env::uri_from_env().unwrap_or(defaults.uri),
            database: env::database_from_env().unwrap_or(defaults.database),
        }
    }
}
