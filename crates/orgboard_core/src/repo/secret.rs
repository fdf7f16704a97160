//! Organization secret transform.
//!
//! Stored form: `sha256$<salt-hex>$<digest-hex>` where the digest is
//! `sha256(salt || secret)` and the salt is 16 random bytes per secret.
//! Comparison happens here, inside the store adapter, and never exposes the
//! stored value to callers.

use crate::model::ModelValidationError;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Derives the stored transform for a new secret.
///
/// # Errors
/// - `BlankSecret` when the secret is empty after trim.
pub fn hash_secret(secret: &str) -> Result<String, ModelValidationError> {
    if secret.trim().is_empty() {
        return Err(ModelValidationError::BlankSecret);
    }
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let digest = salted_digest(&salt, secret);
    Ok(format!(
        "{SCHEME}${}${}",
        hex::encode(salt),
        hex::encode(digest)
    ))
}

/// Checks a submitted secret against a stored transform.
///
/// Malformed stored values never match.
pub fn verify_secret(secret: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(salt_hex), Some(digest_hex), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(digest_hex)) else {
        return false;
    };

    let actual = salted_digest(&salt, secret);
    bool::from(actual.as_slice().ct_eq(expected.as_slice()))
}

fn salted_digest(salt: &[u8], secret: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(secret.as_bytes());
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest
}
