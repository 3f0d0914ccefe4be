// Environment detection and logger bootstrap.

use std::sync::OnceLock;

/// Cached environment mode.
static ENV_MODE: OnceLock<EnvMode> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMode {
    Production,
    Development,
    Test,
}

impl EnvMode {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "production" | "prod" => EnvMode::Production,
            "test" | "testing" => EnvMode::Test,
            _ => EnvMode::Development,
        }
    }
}

/// Detect the current environment mode from environment variables.
/// Checks `MONGO_AUTH_ENV` then `RUST_ENV`.
pub fn detect_env_mode() -> EnvMode {
    *ENV_MODE.get_or_init(|| {
        let env_val = std::env::var("MONGO_AUTH_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default();
        EnvMode::parse(&env_val)
    })
}

pub fn is_production() -> bool {
    detect_env_mode() == EnvMode::Production
}

/// `MONGO_AUTH_URI`, if set and non-empty.
pub fn uri_from_env() -> Option<String> {
    non_empty_var("MONGO_AUTH_URI")
}

/// `MONGO_AUTH_DATABASE`, if set and non-empty.
pub fn database_from_env() -> Option<String> {
    non_empty_var("MONGO_AUTH_DATABASE")
}

/// `MONGO_AUTH_COLLECTION`, if set and non-empty.
pub fn collection_from_env() -> Option<String> {
    non_empty_var("MONGO_AUTH_COLLECTION")
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Initialize the `tracing` subscriber with appropriate defaults.
///
/// `RUST_LOG` wins when set; otherwise production logs at info and everything
/// else at debug. Calling this twice is harmless.
pub fn init_logger() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production() {
            EnvFilter::new("mongo_auth=info")
        } else {
            EnvFilter::new("mongo_auth=debug")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .try_init();
}
