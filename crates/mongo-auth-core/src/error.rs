// Error types for user lookup and credential validation.
//
// "Not found" is never an error here: lookups return `Ok(None)`.

/// Boxed error raised by a document store driver.
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Internal (non-HTTP) error raised by providers and stores.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Any connectivity or query failure from the underlying store, passed
    /// through unchanged.
    #[error("{0}")]
    Database(#[source] StoreError),

    /// A field the provider depends on is absent from the record or the
    /// credential map, or does not hold a string.
    #[error("missing field `{0}`")]
    MissingField(String),

    /// The crypt routine rejected the stored salt.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// A remember-token write matched no stored document.
    #[error("no user document matched id `{0}`")]
    NotPersisted(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// Wrap a driver error without altering its message or source chain.
    #[inline]
    pub fn database<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Database(Box::new(err))
    }

    #[inline]
    pub fn missing_field(name: impl Into<String>) -> Self {
        Self::MissingField(name.into())
    }
}

/// Unified result type for mongo-auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;
