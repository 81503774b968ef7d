//! Account payload shapes and errors.
//!
//! These are the exact JSON bodies exchanged with the vault server.
//! Field names follow the server's camelCase wire format. Transport is
//! the caller's concern; this crate only produces and consumes the
//! payloads.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::CryptoError;

/// Errors produced by account and session operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Login could not be completed with the presented credentials.
    ///
    /// Deliberately covers both a server-side rejection and a failed
    /// decryption of the returned data key, so a caller cannot tell
    /// which check failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The operation requires an authenticated session.
    #[error("not logged in")]
    NotAuthenticated,

    /// An underlying cryptographic operation failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Opaque failure surfaced from the external HTTP collaborator.
    #[error("server error: {0}")]
    Server(String),
}

/// Result type for account operations.
pub type Result<T> = std::result::Result<T, AccountError>;

/// Body of `POST /account`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    /// Account email.
    pub email: String,
    /// Authentication hash standing in for the password.
    pub hashed_local_key: String,
    /// Data key encrypted under the local key.
    pub encrypted_data_key: String,
    /// Opt-in to product update emails.
    pub want_email_updates: bool,
}

/// Body of the `POST /account` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    /// Server-assigned account id.
    pub id: u64,
    /// Account email as registered.
    pub email: String,
    /// Data key ciphertext as persisted.
    pub encrypted_data_key: String,
    /// Opt-in flag as persisted.
    pub want_email_updates: bool,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Authentication hash standing in for the password.
    pub hashed_local_key: String,
}

/// Body of the `POST /login` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub bearer: String,
    /// Token expiry timestamp.
    pub expires: String,
    /// Data key ciphertext, decryptable only with the local key.
    pub encrypted_data_key: String,
}

/// Body of `PUT /account` (password change).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    /// Account email.
    pub email: String,
    /// Authentication hash under the outgoing local key.
    pub old_hashed_local_key: String,
    /// Authentication hash under the incoming local key.
    pub new_hashed_local_key: String,
    /// The unchanged data key, re-encrypted under the incoming local key.
    pub encrypted_data_key: String,
}

/// Body of `POST /confirm`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmEmailRequest {
    /// Confirmation code from the verification email.
    pub code: String,
}

/// Body of `POST /unsubscribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsubscribeRequest {
    /// Email to remove from the updates mailing list.
    pub email: String,
}
