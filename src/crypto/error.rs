use thiserror::Error;

/// Errors produced by the cryptographic layer.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Password generation options failed validation.
    #[error("invalid password options: {0}")]
    InvalidOptions(String),

    /// No character class is enabled for password generation.
    #[error("password character set cannot be empty")]
    EmptyCharacterSet,

    /// A ciphertext token does not have the `ciphertext:iv` shape.
    #[error("malformed ciphertext token")]
    MalformedToken,

    /// Decryption failed: wrong key or tampered ciphertext.
    #[error("decryption failed")]
    DecryptionFailed,

    /// A key had the wrong number of bytes.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes.
        expected: usize,
        /// Actual key length in bytes.
        actual: usize,
    },

    /// Base64 decoding failed.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Result type for cryptographic operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
