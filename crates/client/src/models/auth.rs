//! Login flow models.
//!
//! Responsibilities:
//! - Carry the per-attempt credential, the login public key, and the sealed
//!   form payload.
//! - Express the login result as a value: authenticated or rejected.
//!
//! Invariants:
//! - A [`SealedCredential`] can only be built by [`crate::crypto::seal`], so the
//!   login request can never carry a plaintext secret.
//! - Secrets and session tokens never appear in `Debug` output.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Identifier and secret typed into the login form for one attempt.
#[derive(Debug, Clone)]
pub struct LoginCredential {
    pub identifier: String,
    pub secret: SecretString,
}

impl LoginCredential {
    pub fn new(identifier: impl Into<String>, secret: SecretString) -> Self {
        Self {
            identifier: identifier.into(),
            secret,
        }
    }
}

/// Public key used to encrypt the login secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyInfo {
    pub key_id: String,
    pub public_key: String,
}

/// Credential whose secret has been encrypted with a [`PublicKeyInfo`].
#[derive(Clone)]
pub struct SealedCredential {
    identifier: String,
    encrypted_secret: String,
    key_id: String,
}

impl SealedCredential {
    pub(crate) fn new(identifier: String, encrypted_secret: String, key_id: String) -> Self {
        Self {
            identifier,
            encrypted_secret,
            key_id,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Form fields for `POST /api/v1/login`.
    pub(crate) fn form_fields(&self) -> [(&'static str, &str); 3] {
        [
            ("username", self.identifier.as_str()),
            ("password", self.encrypted_secret.as_str()),
            ("keyId", self.key_id.as_str()),
        ]
    }
}

impl fmt::Debug for SealedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealedCredential")
            .field("identifier", &self.identifier)
            .field("encrypted_secret", &"[REDACTED]")
            .field("key_id", &self.key_id)
            .finish()
    }
}

/// Opaque session token returned by a successful login.
#[derive(Debug, Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    pub fn new(value: String) -> Self {
        Self(SecretString::new(value.into()))
    }

    pub fn secret(&self) -> &SecretString {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }
}

/// Result of a login submission.
///
/// A server-side rejection is a normal value so callers can show the message
/// next to the form instead of unwinding.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    Authenticated(SessionToken),
    Rejected {
        error_code: Option<String>,
        error_message: String,
    },
}

impl LoginOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn token(&self) -> Option<&SessionToken> {
        match self {
            Self::Authenticated(token) => Some(token),
            Self::Rejected { .. } => None,
        }
    }
}
