//! Key and nonce generation utilities.

use rand_core::{OsRng, RngCore};

use super::SecretVec;

/// Size of a symmetric data key in bytes (AES-256).
pub const KEY_BYTES: usize = 32;

/// Size of an AES-CBC initialization vector in bytes.
pub const IV_BYTES: usize = 16;

/// Generate a new random 256-bit symmetric key.
///
/// This key can be used with [`super::cipher::encrypt`] and
/// [`super::cipher::decrypt`]. The data key protecting all credential
/// fields is generated this way, independently of any password-derived key.
///
/// # Returns
/// A 32-byte (256-bit) random key, zeroized on drop.
pub fn generate_key() -> SecretVec {
    let mut key = SecretVec::new(vec![0u8; KEY_BYTES]);
    OsRng.fill_bytes(&mut key);
    key
}

/// Generate a random initialization vector for AES-CBC.
///
/// # Returns
/// A 16-byte random IV.
pub fn generate_iv() -> [u8; IV_BYTES] {
    let mut iv = [0u8; IV_BYTES];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Fill a buffer with random bytes.
///
/// # Arguments
/// * `len` - Number of random bytes to generate.
///
/// # Returns
/// A vector of `len` random bytes.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    OsRng.fill_bytes(&mut buf);
    buf
}
