//! Password-based key derivation.
//!
//! Both the local key and the authentication hash come out of the same
//! PBKDF2-HMAC-SHA-512 construction; only the (secret, salt) roles differ.
//! The local key uses `(password, email)`, the authentication hash uses
//! `(base64(local key), password)`. The server only ever receives the
//! latter, so neither the password nor the local key leaves the client.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;

use super::{SecretVec, encode_b64};

/// PBKDF2 iteration count.
pub const ITERATIONS: u32 = 100_000;

/// Length of a derived key in bytes (256 bits).
pub const DERIVED_KEY_BYTES: usize = 32;

/// Derive a 256-bit symmetric key from a secret and a salt.
///
/// Deterministic: identical inputs always yield an identical key. The
/// local key is derived with `secret = password, salt = account email`.
///
/// # Arguments
/// * `secret` - Password material.
/// * `salt` - PBKDF2 salt.
///
/// # Returns
/// A 32-byte key usable with [`super::cipher`], zeroized on drop.
pub fn derive_key(secret: &str, salt: &str) -> SecretVec {
    let mut key = SecretVec::new(vec![0u8; DERIVED_KEY_BYTES]);
    pbkdf2_hmac::<Sha512>(secret.as_bytes(), salt.as_bytes(), ITERATIONS, &mut key);
    key
}

/// Derive a one-way, fixed-length, base64-encoded hash.
///
/// Runs the same PBKDF2-HMAC-SHA-512 construction as [`derive_key`] but
/// returns the raw derived bits base64-encoded rather than a usable
/// cipher key. The authentication hash is produced by passing
/// `secret = base64(local key bytes), salt = plaintext password`.
///
/// # Arguments
/// * `secret` - Password material.
/// * `salt` - PBKDF2 salt.
///
/// # Returns
/// Base64 encoding of 256 derived bits.
pub fn hash(secret: &str, salt: &str) -> String {
    let mut bits = SecretVec::new(vec![0u8; DERIVED_KEY_BYTES]);
    pbkdf2_hmac::<Sha512>(secret.as_bytes(), salt.as_bytes(), ITERATIONS, &mut bits);
    encode_b64(&bits)
}
