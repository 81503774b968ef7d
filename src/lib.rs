//! Client-side core of a zero-knowledge credential vault.
//!
//! The server never sees plaintext passwords, usernames, site
//! identifiers, or the keys protecting them. What it stores:
//!
//! - an authentication hash standing in for the password;
//! - the data key encrypted under a local key it cannot derive;
//! - per-field ciphertext tokens for every stored credential.
//!
//! [`crypto`] holds the primitives (key derivation, the AES-CBC token
//! cipher, password generation), [`account`] the key lifecycle
//! (register, login, password rotation), and [`credentials`] the
//! field-level codec for stored records.
//!
//! Every operation is synchronous and computationally bounded; callers
//! that must not block (a UI thread) dispatch onto their own workers.

pub mod account;
pub mod credentials;
pub mod crypto;
