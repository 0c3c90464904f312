//! Error types for the EIAM client.
//!
//! Responsibilities:
//! - Define the single error enum returned by every client operation.
//! - Classify `reqwest` failures into timeout, connection, and TLS variants.
//!
//! Does NOT handle:
//! - Server-side login rejections. Those are a normal value
//!   ([`crate::models::LoginOutcome::Rejected`]), not an error.
//!
//! Invariants:
//! - Error messages never include passwords, ciphertext, or session tokens.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during EIAM client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP transport error that is not a timeout, connect, or TLS failure.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection refused or host unreachable.
    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    /// TLS/SSL error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The server answered with a failure envelope or a non-success status.
    #[error("API error ({status}) at {url}: {message}{}", .error_code.as_ref().map(|c| format!(" [code: {c}]")).unwrap_or_default())]
    Api {
        status: u16,
        url: String,
        error_code: Option<String>,
        message: String,
    },

    /// Authentication failed (login rejected or no usable strategy).
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// No valid session is available and none could be established.
    #[error("Session expired for '{identifier}', please log in again")]
    SessionExpired { identifier: String },

    /// HTTP 401 from a protected endpoint.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Response body did not match the expected shape.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Audit query failed validation before being sent.
    #[error("Invalid audit query: {0}")]
    InvalidQuery(String),

    /// The login public key could not be parsed or used.
    #[error("Credential encryption failed: {0}")]
    Encryption(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Build an error from a `reqwest` failure that produced no HTTP response.
    ///
    /// `target` names the host for connection errors and `elapsed` is how long
    /// the request ran before failing.
    pub(crate) fn from_send_error(err: reqwest::Error, target: &str, elapsed: Duration) -> Self {
        if err.is_timeout() {
            return Self::Timeout(elapsed);
        }

        if err.is_connect() {
            let chain = error_chain_text(&err).to_lowercase();
            if chain.contains("certificate") || chain.contains("tls") || chain.contains("handshake")
            {
                return Self::Tls(chain);
            }
            return Self::ConnectionRefused(target.to_string());
        }

        Self::Transport(err)
    }

    /// True when the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Timeout(_) | Self::ConnectionRefused(_) | Self::Tls(_)
        )
    }

    /// Check if this error indicates authentication failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::AuthFailed(_) | Self::SessionExpired { .. } | Self::Unauthorized(_)
        )
    }
}

fn error_chain_text(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}
