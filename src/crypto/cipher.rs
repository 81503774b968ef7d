//! AES-256-CBC encryption of opaque strings as self-contained tokens.
//!
//! Wire format: `base64(ciphertext) + ":" + base64(iv)`, exactly one
//! delimiter, IV always 16 bytes. Every encryption draws a fresh random
//! IV, so tokens for identical plaintext are never identical and the
//! server cannot correlate repeated plaintexts across records.

use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};

use super::{CryptoError, Result, SecretVec, decode_b64, encode_b64, keys};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Size of a cipher key in bytes.
pub const KEY_BYTES: usize = keys::KEY_BYTES;

/// Size of an initialization vector in bytes.
pub const IV_BYTES: usize = keys::IV_BYTES;

const TOKEN_DELIMITER: char = ':';

/// Encrypt a plaintext string under a symmetric key.
///
/// Generates a fresh 16-byte random IV, encrypts with AES-256 in CBC
/// mode (PKCS#7 padding), and returns the self-contained token
/// `base64(ciphertext):base64(iv)`.
///
/// # Arguments
/// * `key` - 32-byte encryption key.
/// * `plaintext` - String to encrypt.
///
/// # Returns
/// The ciphertext token.
pub fn encrypt(key: &[u8], plaintext: &str) -> Result<String> {
    if key.len() != KEY_BYTES {
        return Err(CryptoError::InvalidKeyLength {
            expected: KEY_BYTES,
            actual: key.len(),
        });
    }

    let iv = keys::generate_iv();
    let ciphertext = Aes256CbcEnc::new_from_slices(key, &iv)
        .map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_BYTES,
            actual: key.len(),
        })?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    Ok(format!(
        "{}{}{}",
        encode_b64(&ciphertext),
        TOKEN_DELIMITER,
        encode_b64(&iv)
    ))
}

/// Decrypt a ciphertext token produced by [`encrypt`].
///
/// # Arguments
/// * `key` - 32-byte encryption key.
/// * `token` - `base64(ciphertext):base64(iv)` token.
///
/// # Returns
/// The decrypted plaintext string.
///
/// # Errors
/// [`CryptoError::MalformedToken`] if the token does not have exactly two
/// `:`-separated parts, either part is not valid base64, or the IV is not
/// 16 bytes. [`CryptoError::DecryptionFailed`] if the key does not match
/// or the ciphertext is corrupted.
pub fn decrypt(key: &[u8], token: &str) -> Result<String> {
    if key.len() != KEY_BYTES {
        return Err(CryptoError::InvalidKeyLength {
            expected: KEY_BYTES,
            actual: key.len(),
        });
    }

    let mut parts = token.split(TOKEN_DELIMITER);
    let ciphertext_b64 = parts.next().ok_or(CryptoError::MalformedToken)?;
    let iv_b64 = parts.next().ok_or(CryptoError::MalformedToken)?;
    if parts.next().is_some() {
        return Err(CryptoError::MalformedToken);
    }

    let ciphertext = decode_b64(ciphertext_b64).map_err(|_| CryptoError::MalformedToken)?;
    let iv = decode_b64(iv_b64).map_err(|_| CryptoError::MalformedToken)?;
    if iv.len() != IV_BYTES {
        return Err(CryptoError::MalformedToken);
    }

    // CBC ciphertext is always a whole number of non-empty blocks
    if ciphertext.is_empty() || ciphertext.len() % IV_BYTES != 0 {
        return Err(CryptoError::DecryptionFailed);
    }

    let plaintext = Aes256CbcDec::new_from_slices(key, &iv)
        .map_err(|_| CryptoError::DecryptionFailed)?
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
}

/// Export a raw symmetric key as a base64 string.
///
/// Used only to carry a key through the data-key encryption step; the
/// exported form is immediately re-encrypted, never sent bare.
pub fn export_key(key: &[u8]) -> String {
    encode_b64(key)
}

/// Import a symmetric key from its base64 export.
///
/// Lossless round-trip counterpart of [`export_key`].
///
/// # Errors
/// [`CryptoError::InvalidKeyLength`] if the decoded key is not 32 bytes.
pub fn import_key(b64: &str) -> Result<SecretVec> {
    let raw = decode_b64(b64)?;
    if raw.len() != KEY_BYTES {
        return Err(CryptoError::InvalidKeyLength {
            expected: KEY_BYTES,
            actual: raw.len(),
        });
    }
    Ok(SecretVec::new(raw))
}
