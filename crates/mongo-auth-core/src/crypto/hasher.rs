// Password hasher contract, plus the legacy crypt-over-SHA-1 implementation.

use std::fmt;

use crate::crypto::legacy::{constant_time_equal, legacy_hash, sha1_hex};
use crate::error::{AuthError, Result};

/// Hashing service supplied by the host framework.
pub trait PasswordHasher: Send + Sync + fmt::Debug {
    /// Hash a plaintext password with a fresh salt.
    fn make(&self, plain: &str) -> Result<String>;

    /// Check a plaintext password against a stored hash.
    fn check(&self, plain: &str, hashed: &str) -> Result<bool>;

    /// Whether `hashed` should be regenerated with the current settings.
    fn needs_rehash(&self, _hashed: &str) -> bool {
        false
    }
}

/// `crypt(sha1_hex(plain), salt)` hasher producing MD5-crypt (`$1$`) hashes.
///
/// Checking accepts every crypt variant, since the stored hash doubles as the
/// crypt setting.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyCryptHasher;

impl LegacyCryptHasher {
    const PREFIX: &'static str = "$1$";

    pub fn new() -> Self {
        Self
    }

    /// Hash with an explicit salt string (e.g. the record's `PasswordSalt`).
    pub fn hash_with_salt(&self, plain: &str, salt: &str) -> Result<String> {
        legacy_hash(plain, salt)
    }

    /// Hash with a fresh MD5-crypt salt, returning `(hash, salt)`.
    ///
    /// The salt is what a record stores as `PasswordSalt`.
    pub fn make_with_salt(&self, plain: &str) -> Result<(String, String)> {
        let hash = pwhash::md5_crypt::hash(sha1_hex(plain))
            .map_err(|e| AuthError::Crypto(format!("md5-crypt failed: {e}")))?;
        let salt = setting_of(&hash)
            .ok_or_else(|| AuthError::Crypto("md5-crypt produced an unexpected format".into()))?
            .to_string();
        Ok((hash, salt))
    }
}

impl PasswordHasher for LegacyCryptHasher {
    fn make(&self, plain: &str) -> Result<String> {
        self.make_with_salt(plain).map(|(hash, _)| hash)
    }

    fn check(&self, plain: &str, hashed: &str) -> Result<bool> {
        if hashed.is_empty() {
            return Ok(false);
        }
        let computed = legacy_hash(plain, hashed)?;
        Ok(constant_time_equal(computed.as_bytes(), hashed.as_bytes()))
    }

    fn needs_rehash(&self, hashed: &str) -> bool {
        !hashed.starts_with(Self::PREFIX)
    }
}

/// The `$id$salt$` setting of a modular crypt hash.
fn setting_of(hash: &str) -> Option<&str> {
    if !hash.starts_with('$') {
        return None;
    }
    hash.rfind('$').filter(|&i| i > 0).map(|i| &hash[..=i])
}
