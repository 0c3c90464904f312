//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map ClientError variants to appropriate exit codes.
//! - Carry a rejected login through `anyhow` so it exits like an auth failure.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Signal handling (see cancellation.rs for SIGINT handling).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use eiam_client::ClientError;
use thiserror::Error;

/// Structured exit codes for eiam-cli.
///
/// These codes enable scripts to distinguish between different failure modes
/// and take appropriate action (refresh credentials, fix input, fail fast).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Authentication failure - rejected credentials or expired session.
    ///
    /// Scripts should refresh credentials or prompt for re-authentication.
    AuthenticationFailed = 2,

    /// Connection error - network, timeout, TLS, or DNS failure.
    ConnectionError = 3,

    /// Resource not found.
    NotFound = 4,

    /// Validation error - bad query parameters or an unexpected reply shape.
    ///
    /// Scripts should fix the input and not repeat the same request.
    ValidationError = 5,

    /// Permission denied - insufficient privileges.
    PermissionDenied = 6,

    /// Interrupted - SIGINT/Ctrl+C (Unix standard: 128 + 2).
    Interrupted = 130,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

/// The console answered the login form with a failure envelope.
#[derive(Debug, Error)]
#[error("Login rejected: {message}{}", .error_code.as_ref().map(|c| format!(" [code: {c}]")).unwrap_or_default())]
pub struct LoginRejected {
    pub error_code: Option<String>,
    pub message: String,
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::AuthFailed(_)
            | ClientError::SessionExpired { .. }
            | ClientError::Unauthorized(_) => ExitCode::AuthenticationFailed,

            ClientError::ConnectionRefused(_)
            | ClientError::Timeout(_)
            | ClientError::Tls(_)
            | ClientError::InvalidUrl(_) => ExitCode::ConnectionError,

            ClientError::InvalidQuery(_) | ClientError::InvalidResponse(_) => {
                ExitCode::ValidationError
            }

            ClientError::Api { status, .. } => match status {
                400 => ExitCode::ValidationError,
                401 => ExitCode::AuthenticationFailed,
                403 => ExitCode::PermissionDenied,
                404 => ExitCode::NotFound,
                _ => ExitCode::GeneralError,
            },

            ClientError::Transport(e) => {
                if e.is_connect() || e.is_timeout() {
                    ExitCode::ConnectionError
                } else {
                    ExitCode::GeneralError
                }
            }

            ClientError::Encryption(_) => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(client_err) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(client_err);
            }
            if cause.is::<LoginRejected>() {
                return ExitCode::AuthenticationFailed;
            }
        }

        ExitCode::GeneralError
    }
}
