//! Account key lifecycle: registration, login, password change.
//!
//! The session owns the two client-side keys:
//! - the **local key**, derived from `(password, email)` and never
//!   transmitted; its hash authenticates the client and it decrypts the
//!   server-held encrypted data key;
//! - the **data key**, generated once at registration, constant across
//!   password changes, protecting every credential field.
//!
//! Server interaction is the caller's responsibility. Each operation
//! returns the request payload to send plus a pending value; the caller
//! confirms the pending value only after the server reports success, so
//! a failed network call leaves the session exactly as it was.
//!
//! ```ignore
//! let (request, pending) = account::begin_login(password, email);
//! let response = http.post_login(&request)?;           // external
//! pending.complete(&mut session, &response)?;          // keys installed
//! ```

mod types;

pub use types::{
    AccountError, ConfirmEmailRequest, LoginRequest, LoginResponse, PasswordChangeRequest,
    RegistrationRequest, RegistrationResponse, Result, UnsubscribeRequest,
};

use crate::crypto::{SecretVec, cipher, kdf, keys};

/// In-memory authenticated session state.
///
/// Owned by the caller and passed by reference into every operation
/// that needs key material; there is no global session. Everything that
/// installs or replaces keys takes `&mut Session`, so the borrow
/// checker enforces that a reader never observes a half-updated key and
/// that only one rotation lands at a time.
#[derive(Default)]
pub struct Session {
    local_key: Option<SecretVec>,
    data_key: Option<SecretVec>,
    bearer_token: Option<String>,
    email: Option<String>,
}

impl Session {
    /// Create an empty, unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the session holds a usable key pair.
    pub fn is_authenticated(&self) -> bool {
        self.local_key.is_some() && self.data_key.is_some()
    }

    /// Borrow the data key for credential encryption/decryption.
    ///
    /// # Errors
    /// [`AccountError::NotAuthenticated`] if no login or confirmed
    /// registration has populated the session.
    pub fn data_key(&self) -> Result<&[u8]> {
        self.data_key
            .as_deref()
            .ok_or(AccountError::NotAuthenticated)
    }

    /// The authenticated account email, if any.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// The bearer token from the last completed login, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    /// Prepare a password change for the authenticated account.
    ///
    /// Computes the old authentication hash from the *current* local
    /// key, derives a brand-new local key from `(new_password, email)`,
    /// and re-encrypts the existing, unchanged data key under it. The
    /// three values in the returned [`PasswordChangeRequest`] must be
    /// submitted to the server as one atomic update; the session keeps
    /// the old local key until [`PendingRotation::confirm`] is called.
    ///
    /// # Errors
    /// [`AccountError::NotAuthenticated`] without an authenticated
    /// session.
    pub fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(PasswordChangeRequest, PendingRotation)> {
        let (Some(local_key), Some(data_key), Some(email)) =
            (&self.local_key, &self.data_key, &self.email)
        else {
            return Err(AccountError::NotAuthenticated);
        };

        let old_hashed_local_key = kdf::hash(&cipher::export_key(local_key), current_password);

        let new_local_key = kdf::derive_key(new_password, email);
        let new_hashed_local_key =
            kdf::hash(&cipher::export_key(&new_local_key), new_password);
        let encrypted_data_key =
            cipher::encrypt(&new_local_key, &cipher::export_key(data_key))?;

        log::debug!("prepared password rotation");

        Ok((
            PasswordChangeRequest {
                email: email.clone(),
                old_hashed_local_key,
                new_hashed_local_key,
                encrypted_data_key,
            },
            PendingRotation { new_local_key },
        ))
    }

    /// Clear all key material and session state.
    ///
    /// Key buffers are zeroized on drop; nothing retains a copy after
    /// this returns.
    pub fn logout(&mut self) {
        self.local_key = None;
        self.data_key = None;
        self.bearer_token = None;
        self.email = None;
        log::debug!("session cleared");
    }
}

/// Keys produced by [`register`], held back until the server confirms
/// account creation.
pub struct PendingRegistration {
    local_key: SecretVec,
    data_key: SecretVec,
    email: String,
}

impl PendingRegistration {
    /// Install the registration keys into the session.
    ///
    /// Call only after the server accepted the registration request.
    pub fn confirm(self, session: &mut Session) {
        session.local_key = Some(self.local_key);
        session.data_key = Some(self.data_key);
        session.email = Some(self.email);
        log::debug!("registration confirmed");
    }
}

/// Derived login state awaiting the server's response.
pub struct PendingLogin {
    local_key: SecretVec,
    email: String,
}

impl PendingLogin {
    /// Complete the login with the server's response.
    ///
    /// Decrypts the returned encrypted data key with the derived local
    /// key and populates the session.
    ///
    /// # Errors
    /// [`AccountError::AuthenticationFailed`] if the data key does not
    /// decrypt: a wrong password or email, or a tampered ciphertext.
    /// The variant is identical to an ordinary login rejection on
    /// purpose, so callers cannot distinguish which check failed.
    pub fn complete(self, session: &mut Session, response: &LoginResponse) -> Result<()> {
        let exported_data_key = cipher::decrypt(&self.local_key, &response.encrypted_data_key)
            .map_err(|_| AccountError::AuthenticationFailed)?;
        let data_key = cipher::import_key(&exported_data_key)
            .map_err(|_| AccountError::AuthenticationFailed)?;

        session.local_key = Some(self.local_key);
        session.data_key = Some(data_key);
        session.bearer_token = Some(response.bearer.clone());
        session.email = Some(self.email);
        log::debug!("login completed");
        Ok(())
    }
}

/// A derived local key awaiting server confirmation of a password
/// change. Dropping it leaves the session on the old key.
pub struct PendingRotation {
    new_local_key: SecretVec,
}

impl PendingRotation {
    /// Swap the session onto the new local key.
    ///
    /// Call only after the server accepted the atomic password-change
    /// update. The data key is untouched; only its encryption wrapper
    /// changed server-side.
    pub fn confirm(self, session: &mut Session) {
        session.local_key = Some(self.new_local_key);
        log::debug!("password rotation confirmed");
    }
}

/// Derive the keys for a new account.
///
/// Derives the local key from `(password, email)`, hashes it into the
/// authentication hash, generates a fresh random data key independent of
/// the local key, and encrypts the data key under the local key. The
/// returned request carries everything the server stores; the returned
/// [`PendingRegistration`] carries everything the client keeps.
pub fn register(
    password: &str,
    email: &str,
    want_email_updates: bool,
) -> Result<(RegistrationRequest, PendingRegistration)> {
    let local_key = kdf::derive_key(password, email);
    let hashed_local_key = kdf::hash(&cipher::export_key(&local_key), password);

    let data_key = keys::generate_key();
    let encrypted_data_key = cipher::encrypt(&local_key, &cipher::export_key(&data_key))?;

    log::debug!("derived registration keys");

    Ok((
        RegistrationRequest {
            email: email.to_string(),
            hashed_local_key,
            encrypted_data_key,
            want_email_updates,
        },
        PendingRegistration {
            local_key,
            data_key,
            email: email.to_string(),
        },
    ))
}

/// Derive the login authentication hash for an account.
///
/// The same derivation as [`register`]: local key from
/// `(password, email)`, authentication hash from the exported local key
/// and the password. The server's response is fed to
/// [`PendingLogin::complete`] to finish the state transition.
pub fn begin_login(password: &str, email: &str) -> (LoginRequest, PendingLogin) {
    let local_key = kdf::derive_key(password, email);
    let hashed_local_key = kdf::hash(&cipher::export_key(&local_key), password);

    log::debug!("derived login keys");

    (
        LoginRequest {
            email: email.to_string(),
            hashed_local_key,
        },
        PendingLogin {
            local_key,
            email: email.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CryptoError;

    fn login_response_for(pending_reg: &RegistrationRequest) -> LoginResponse {
        LoginResponse {
            bearer: "bearer-token".into(),
            expires: "2026-01-01T00:00:00Z".into(),
            encrypted_data_key: pending_reg.encrypted_data_key.clone(),
        }
    }

    #[test]
    fn test_new_session_is_unauthenticated() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(matches!(
            session.data_key(),
            Err(AccountError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_register_then_confirm_populates_session() {
        let mut session = Session::new();
        let (request, pending) = register("Sup3r$ecret!", "a@b.com", false).unwrap();

        assert_eq!(request.email, "a@b.com");
        assert!(!request.hashed_local_key.is_empty());

        pending.confirm(&mut session);
        assert!(session.is_authenticated());
        assert_eq!(session.email(), Some("a@b.com"));
    }

    #[test]
    fn test_registration_data_key_is_independent_of_local_key() {
        let (request, pending) = register("pw", "a@b.com", false).unwrap();

        let local_key = kdf::derive_key("pw", "a@b.com");
        let exported = cipher::decrypt(&local_key, &request.encrypted_data_key).unwrap();
        let data_key = cipher::import_key(&exported).unwrap();

        assert_ne!(&data_key[..], &local_key[..]);

        let mut session = Session::new();
        pending.confirm(&mut session);
        assert_eq!(session.data_key().unwrap(), &data_key[..]);
    }

    #[test]
    fn test_login_reproduces_registration_hash_and_data_key() {
        let (reg_request, reg_pending) = register("Sup3r$ecret!", "a@b.com", false).unwrap();
        let mut reg_session = Session::new();
        reg_pending.confirm(&mut reg_session);

        let (login_request, login_pending) = begin_login("Sup3r$ecret!", "a@b.com");
        assert_eq!(login_request.hashed_local_key, reg_request.hashed_local_key);

        let mut session = Session::new();
        login_pending
            .complete(&mut session, &login_response_for(&reg_request))
            .unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.bearer_token(), Some("bearer-token"));
        assert_eq!(
            session.data_key().unwrap(),
            reg_session.data_key().unwrap()
        );
    }

    #[test]
    fn test_login_with_wrong_password_fails_as_auth_error() {
        let (reg_request, _) = register("correct-pw", "a@b.com", false).unwrap();

        let (_, login_pending) = begin_login("wrong-pw", "a@b.com");
        let mut session = Session::new();
        let result = login_pending.complete(&mut session, &login_response_for(&reg_request));

        assert!(matches!(result, Err(AccountError::AuthenticationFailed)));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_login_with_tampered_data_key_fails_as_auth_error() {
        let (reg_request, _) = register("pw", "a@b.com", false).unwrap();

        let mut response = login_response_for(&reg_request);
        response.encrypted_data_key = response.encrypted_data_key.replace(':', "");

        let (_, login_pending) = begin_login("pw", "a@b.com");
        let mut session = Session::new();
        let result = login_pending.complete(&mut session, &response);

        assert!(matches!(result, Err(AccountError::AuthenticationFailed)));
    }

    #[test]
    fn test_change_password_requires_authentication() {
        let session = Session::new();
        let result = session.change_password("old", "new");
        assert!(matches!(result, Err(AccountError::NotAuthenticated)));
    }

    #[test]
    fn test_change_password_preserves_data_key() {
        let (reg_request, reg_pending) = register("old1234", "a@b.com", false).unwrap();
        let mut session = Session::new();
        reg_pending.confirm(&mut session);
        let original_data_key = session.data_key().unwrap().to_vec();

        let (change_request, rotation) =
            session.change_password("old1234", "newPassw0rd").unwrap();
        rotation.confirm(&mut session);

        // The re-encrypted data key decrypts to the same key under the
        // new local key
        let new_local_key = kdf::derive_key("newPassw0rd", "a@b.com");
        let exported =
            cipher::decrypt(&new_local_key, &change_request.encrypted_data_key).unwrap();
        let recovered = cipher::import_key(&exported).unwrap();
        assert_eq!(&recovered[..], &original_data_key[..]);

        // Session still holds the identical data key
        assert_eq!(session.data_key().unwrap(), &original_data_key[..]);

        // Old hash matches the registration hash; new hash differs
        assert_eq!(
            change_request.old_hashed_local_key,
            reg_request.hashed_local_key
        );
        assert_ne!(
            change_request.new_hashed_local_key,
            change_request.old_hashed_local_key
        );
    }

    #[test]
    fn test_dropped_rotation_leaves_session_usable() {
        let (_, reg_pending) = register("old1234", "a@b.com", false).unwrap();
        let mut session = Session::new();
        reg_pending.confirm(&mut session);

        let (change_request, rotation) =
            session.change_password("old1234", "newPassw0rd").unwrap();
        // Server rejected the update: drop the rotation instead of
        // confirming it
        drop(rotation);
        drop(change_request);

        // The session still rotates successfully from its original key
        let (second_request, rotation) =
            session.change_password("old1234", "an0ther!").unwrap();
        rotation.confirm(&mut session);
        assert!(!second_request.new_hashed_local_key.is_empty());
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_logout_clears_state() {
        let (_, reg_pending) = register("pw", "a@b.com", false).unwrap();
        let mut session = Session::new();
        reg_pending.confirm(&mut session);

        session.logout();
        assert!(!session.is_authenticated());
        assert_eq!(session.email(), None);
        assert_eq!(session.bearer_token(), None);
        assert!(matches!(
            session.data_key(),
            Err(AccountError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_error_conversions() {
        let err = AccountError::Server("503 service unavailable".into());
        assert!(err.to_string().contains("503"));

        let crypto_err: AccountError = CryptoError::MalformedToken.into();
        assert!(matches!(crypto_err, AccountError::Crypto(_)));
    }
}
