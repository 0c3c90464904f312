//! Main EIAM console client and API methods.
//!
//! This module provides the primary [`EiamClient`] for the console's login and
//! audit APIs. It keeps the HTTP client (with its cookie jar) and the session
//! state for one user.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `session`: Token retrieval and lazy login (private module)
//! - `login`: Public key, credential submission, and the composed login flow
//! - `audit`: Event-type taxonomy and audit page queries
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - Low-level session token storage (delegated to [`crate::auth::SessionManager`])
//! - Secret encryption (delegated to [`crate::crypto`])
//!
//! # Invariants
//! - No request is retried. A 401 from a protected endpoint clears the stored
//!   session so the next call logs in again.
//! - Methods that may log in take `&mut self`.

pub mod builder;
mod audit;
mod login;
mod session;

pub use audit::AuditView;

use chrono::FixedOffset;

use crate::auth::SessionManager;
use crate::error::ClientError;
use crate::metrics::MetricsCollector;

/// EIAM console API client.
///
/// # Creating a Client
///
/// Use [`EiamClient::builder()`] to create a new client:
///
/// ```rust,ignore
/// use eiam_client::{EiamClient, AuthStrategy};
/// use secrecy::SecretString;
///
/// let client = EiamClient::builder()
///     .base_url("https://eiam.example.com".to_string())
///     .auth_strategy(AuthStrategy::Password {
///         identifier: "alice".to_string(),
///         secret: SecretString::new("correct".to_string().into()),
///     })
///     .build()?;
/// ```
///
/// # Authentication
///
/// - `AuthStrategy::Password`: encrypted login on first use, session token kept in memory
/// - `AuthStrategy::ApiToken`: static bearer token, no login
#[derive(Debug)]
pub struct EiamClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) session_manager: SessionManager,
    pub(crate) session_ttl_seconds: u64,
    pub(crate) session_expiry_buffer_seconds: u64,
    pub(crate) display_offset: FixedOffset,
    pub(crate) metrics: Option<MetricsCollector>,
}

impl EiamClient {
    /// Create a new client builder.
    pub fn builder() -> builder::EiamClientBuilder {
        builder::EiamClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Offset of the console's display timezone.
    pub fn display_offset(&self) -> FixedOffset {
        self.display_offset
    }

    /// Forget the stored session after the server refused it.
    pub(crate) fn note_failure(&mut self, error: &ClientError) {
        if matches!(error, ClientError::Unauthorized(_)) && !self.is_api_token_auth() {
            tracing::debug!("Session rejected by server; clearing stored token");
            self.session_manager.clear_session();
        }
    }
}
