//! Password hashing.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

/// Hashes a password with SHA-256 and returns the lowercase hex digest.
///
/// No salt is applied: the digest doubles as the duplicate-detection key and
/// is the on-disk format of existing stores.
pub fn hash_password(password: &SecretString) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.expose_secret().as_bytes());
    hex::encode(hasher.finalize())
}
