#![doc = include_str!("../README.md")]

pub mod config;
pub mod credentials;
pub mod crypto;
pub mod db;
pub mod env;
pub mod error;
pub mod provider;

// Re-exports for convenience
pub use config::{ConnectionConfig, FieldMapping, ProviderConfig};
pub use credentials::Credentials;
pub use crypto::{LegacyCryptHasher, PasswordHasher};
pub use db::models::{Authenticatable, GenericUser};
pub use db::store::{Document, DocumentStore, WhereClause};
pub use error::{AuthError, Result};
pub use provider::{DocumentUserProvider, UserProvider};
