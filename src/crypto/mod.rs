//! Cryptographic primitives used by the vault client.
//!
//! Pure Rust implementation. The server only ever sees the outputs of
//! [`kdf::hash`] and [`cipher::encrypt`]; every key stays client-side.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

mod error;

pub mod cipher;
pub mod kdf;
pub mod keys;
pub mod passgen;

pub use error::{CryptoError, Result};

/// A heap-allocated byte buffer that is **zeroized on drop**.
///
/// Prefer this type for sensitive key material that should not remain in
/// memory after it goes out of scope.
pub type SecretVec = zeroize::Zeroizing<Vec<u8>>;

/// Decode a base64 string to bytes.
///
/// # Arguments
/// * `input` - Base64 encoded string.
///
/// # Returns
/// The decoded bytes.
pub fn decode_b64(input: &str) -> Result<Vec<u8>> {
    Ok(BASE64.decode(input)?)
}

/// Encode bytes to a base64 string.
///
/// This is standard base64 (RFC 4648 §4), the alphabet used for every
/// value persisted or transmitted by the vault.
///
/// # Arguments
/// * `input` - Bytes to encode.
///
/// # Returns
/// Base64 encoded string.
pub fn encode_b64(input: &[u8]) -> String {
    BASE64.encode(input)
}
