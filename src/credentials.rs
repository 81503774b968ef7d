//! Field-level encryption of stored credentials.
//!
//! Each sensitive field (site URI, username, password) is encrypted
//! independently under the session's data key, with its own random IV.
//! The routing email and its status are not secret (the relay needs
//! them in the clear to forward mail) and pass through unencrypted.

use serde::{Deserialize, Serialize};

use crate::crypto::{CryptoError, Result, cipher};

/// A credential as entered by the user, before encryption.
#[derive(Debug, Clone)]
pub struct NewCredential {
    /// Site identifier/URI.
    pub uri: String,
    /// Login username.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Plaintext routing email.
    pub email: String,
}

/// A decrypted view of a stored credential.
///
/// Ephemeral: exists only in process memory for display, never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DecryptedCredential {
    /// Server-assigned credential id.
    pub id: u64,
    /// Site identifier/URI.
    pub uri: String,
    /// Login username.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Plaintext routing email.
    pub email: String,
    /// Relay status of the routing email.
    pub email_status: String,
}

/// Body of `POST /credentials`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCredentialRequest {
    /// Ciphertext of the site URI (the server keys on both `name` and
    /// `uri`, so the same token is stored twice).
    pub encrypted_name: String,
    /// Ciphertext of the username.
    pub encrypted_username: String,
    /// Plaintext routing email.
    pub email: String,
    /// Ciphertext of the password.
    pub encrypted_password: String,
    /// Ciphertext of the site URI.
    pub encrypted_uri: String,
}

/// Body of `PUT /credentials/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCredentialRequest {
    /// Ciphertext of the site URI, duplicated as for creation.
    pub encrypted_name: String,
    /// Ciphertext of the username.
    pub encrypted_username: String,
    /// Ciphertext of the password.
    pub encrypted_password: String,
    /// Ciphertext of the site URI.
    pub encrypted_uri: String,
}

/// A stored credential as returned by `GET /credentials`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    /// Server-assigned credential id.
    pub id: u64,
    /// Owning account id.
    #[serde(rename = "accountID")]
    pub account_id: u64,
    /// Ciphertext of the site URI under the `name` key.
    pub encrypted_name: String,
    /// Ciphertext of the username.
    pub encrypted_username: String,
    /// Plaintext routing email.
    pub email: String,
    /// Relay status of the routing email.
    pub email_status: String,
    /// Ciphertext of the password.
    pub encrypted_password: String,
    /// Ciphertext of the site URI.
    pub encrypted_uri: String,
}

/// A sensitive credential field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    /// The site identifier/URI.
    Uri,
    /// The login username.
    Username,
    /// The login password.
    Password,
}

/// A single field that failed to decrypt while its siblings succeeded.
#[derive(Debug)]
pub struct FieldError {
    /// Which field failed.
    pub field: CredentialField,
    /// Why it failed.
    pub error: CryptoError,
}

/// Encrypt a new credential's sensitive fields for creation.
///
/// Each field gets an independent random IV. The URI ciphertext is
/// duplicated into `encryptedName`; external storage keys on both
/// fields.
pub fn encrypt_credential(data_key: &[u8], cred: &NewCredential) -> Result<CreateCredentialRequest> {
    let encrypted_uri = cipher::encrypt(data_key, &cred.uri)?;
    let encrypted_username = cipher::encrypt(data_key, &cred.username)?;
    let encrypted_password = cipher::encrypt(data_key, &cred.password)?;

    Ok(CreateCredentialRequest {
        encrypted_name: encrypted_uri.clone(),
        encrypted_username,
        email: cred.email.clone(),
        encrypted_password,
        encrypted_uri,
    })
}

/// Encrypt a credential's sensitive fields for an update.
///
/// Same encryption as [`encrypt_credential`]; the update body carries no
/// routing email.
pub fn update_credential(data_key: &[u8], cred: &NewCredential) -> Result<UpdateCredentialRequest> {
    let encrypted_uri = cipher::encrypt(data_key, &cred.uri)?;
    let encrypted_username = cipher::encrypt(data_key, &cred.username)?;
    let encrypted_password = cipher::encrypt(data_key, &cred.password)?;

    Ok(UpdateCredentialRequest {
        encrypted_name: encrypted_uri.clone(),
        encrypted_username,
        encrypted_password,
        encrypted_uri,
    })
}

/// Decrypt a stored credential's sensitive fields.
///
/// Fields are decrypted independently: when one fails, the others are
/// still attempted and returned, the failing field is surfaced as an
/// empty string, and the failure is reported alongside the result. One
/// corrupt record must not hide the rest of the vault.
pub fn decrypt_credential(
    data_key: &[u8],
    record: &CredentialRecord,
) -> (DecryptedCredential, Vec<FieldError>) {
    let mut errors = Vec::new();

    let mut field = |name: CredentialField, token: &str| match cipher::decrypt(data_key, token) {
        Ok(plaintext) => plaintext,
        Err(error) => {
            log::warn!("credential {} field {:?} failed to decrypt", record.id, name);
            errors.push(FieldError { field: name, error });
            String::new()
        }
    };

    let uri = field(CredentialField::Uri, &record.encrypted_uri);
    let username = field(CredentialField::Username, &record.encrypted_username);
    let password = field(CredentialField::Password, &record.encrypted_password);

    (
        DecryptedCredential {
            id: record.id,
            uri,
            username,
            password,
            email: record.email.clone(),
            email_status: record.email_status.clone(),
        },
        errors,
    )
}
