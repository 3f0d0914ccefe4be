// Legacy password scheme: Unix crypt over the SHA-1 hex digest of the plaintext.
//
// Stored hashes are `crypt(sha1_hex(plain), salt)`, where the salt string picks
// the crypt variant (`$1$` MD5, `$5$` SHA-256, `$6$` SHA-512, `$2y$` bcrypt,
// `_` BSDi, or two characters for DES). The output must stay byte-identical
// or existing users can no longer sign in.

use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

use crate::error::{AuthError, Result};

/// Lowercase hex SHA-1 digest of `input`.
#[inline]
pub fn sha1_hex(input: &str) -> String {
    hex::encode(Sha1::digest(input.as_bytes()))
}

/// Compute `crypt(sha1_hex(plain), salt)`.
pub fn legacy_hash(plain: &str, salt: &str) -> Result<String> {
    pwhash::unix::crypt(sha1_hex(plain), salt)
        .map_err(|e| AuthError::Crypto(format!("crypt rejected salt: {e}")))
}

/// Compare two byte slices in constant time.
pub fn constant_time_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
