pub mod hasher;
pub mod legacy;

pub use hasher::{LegacyCryptHasher, PasswordHasher};
pub use legacy::{constant_time_equal, legacy_hash, sha1_hex};
