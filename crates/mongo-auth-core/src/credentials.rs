// Credential map submitted by a login attempt.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::FieldMapping;
use crate::db::store::WhereClause;
use crate::error::{AuthError, Result};

/// Field name → submitted value, e.g. `{"Email": "...", "Password": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(BTreeMap<String, String>);

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The submitted plaintext password.
    pub fn plaintext_password(&self, fields: &FieldMapping) -> Result<&str> {
        self.get(&fields.credential_password)
            .ok_or_else(|| AuthError::missing_field(fields.credential_password.as_str()))
    }

    /// Equality filters for every key that is not password-like.
    pub fn query_clauses(&self, fields: &FieldMapping) -> Vec<WhereClause> {
        self.iter()
            .filter(|(key, _)| fields.is_queryable(key))
            .map(|(key, value)| WhereClause::eq(key, value))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Credentials
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Credentials
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
