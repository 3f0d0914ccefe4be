// Generic user view — the normalized user handed to the authentication framework.

use serde::{Serialize, Serializer};
use serde::ser::SerializeMap;

use crate::db::store::{Document, ID_FIELD};
use crate::error::{AuthError, Result};

/// What the framework needs from any authenticated user value.
pub trait Authenticatable {
    /// Unique identifier of the user.
    fn auth_identifier(&self) -> &str;

    /// The password hash the framework compares against, if known.
    fn auth_password(&self) -> Option<&str>;

    /// Name of the attribute holding the "remember me" token.
    fn remember_token_name(&self) -> &str;

    /// Current "remember me" token, if any.
    fn remember_token(&self) -> Option<&str>;

    /// Replace the "remember me" token in memory.
    fn set_remember_token(&mut self, token: &str);
}

/// A stored user record exposed to the framework.
///
/// `attributes` holds every stored field verbatim (including `_id`); `id` and
/// `password` are the normalized fields added by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericUser {
    /// String form of the stored primary key.
    pub id: String,
    /// Normalized auth password. Only credential lookups fill this in.
    pub password: Option<String>,
    /// Name of the attribute holding the "remember me" token.
    pub remember_token_name: String,
    /// Stored fields, copied as-is.
    pub attributes: Document,
}

impl GenericUser {
    /// Build a view from a stored document, stringifying its `_id`.
    pub fn from_document(attributes: Document, remember_token_name: impl Into<String>) -> Result<Self> {
        let id = attributes
            .get(ID_FIELD)
            .map(stringify_id)
            .ok_or_else(|| AuthError::missing_field(ID_FIELD))?;

        Ok(Self {
            id,
            password: None,
            remember_token_name: remember_token_name.into(),
            attributes,
        })
    }

    /// Attach the normalized auth password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Raw stored attribute.
    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(name)
    }

    /// Stored attribute that must exist and hold a string.
    pub fn require_str(&self, name: &str) -> Result<&str> {
        self.attributes
            .get(name)
            .and_then(|v| v.as_str())
            .ok_or_else(|| AuthError::missing_field(name))
    }

    /// Set (or overwrite) a stored attribute in memory.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// The flattened map form: stored fields plus `id` and, when set, `password`.
    pub fn to_map(&self) -> Document {
        let mut map = self.attributes.clone();
        map.insert("id".into(), self.id.clone().into());
        if let Some(ref password) = self.password {
            map.insert("password".into(), password.clone().into());
        }
        map
    }
}

impl Authenticatable for GenericUser {
    fn auth_identifier(&self) -> &str {
        &self.id
    }

    fn auth_password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    fn remember_token_name(&self) -> &str {
        &self.remember_token_name
    }

    fn remember_token(&self) -> Option<&str> {
        self.attributes
            .get(&self.remember_token_name)
            .and_then(|v| v.as_str())
    }

    fn set_remember_token(&mut self, token: &str) {
        let name = self.remember_token_name.clone();
        self.set_attribute(name, token);
    }
}

impl Serialize for GenericUser {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let map = self.to_map();
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (k, v) in &map {
            out.serialize_entry(k, v)?;
        }
        out.end()
    }
}

/// String form of a stored primary key.
///
/// Strings pass through untouched; anything else uses its canonical JSON text,
/// so the same key always yields the same string.
pub fn stringify_id(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
