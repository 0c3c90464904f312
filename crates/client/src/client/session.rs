//! Client-level session management helpers.
//!
//! # What this module does NOT handle:
//! - Low-level session token storage and expiry tracking (handled by [`SessionManager`] in `auth.rs`)
//! - The login HTTP calls (handled by `login.rs` and [`crate::endpoints`])
//!
//! # Invariants
//! - [`EiamClient::auth_token()`] requires `&mut self` because it may trigger a login
//! - API token authentication never triggers login; the token is returned directly
//! - Password authentication logs in when no session exists or it expires soon
//!
//! [`SessionManager`]: crate::auth::SessionManager

use crate::auth::AuthStrategy;
use crate::client::EiamClient;
use crate::error::{ClientError, Result};
use crate::models::{LoginCredential, LoginOutcome};

impl EiamClient {
    /// Get the bearer token for protected endpoints, logging in if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthFailed`] if the server rejects the configured credential.
    /// Returns [`ClientError::SessionExpired`] if no valid token is available afterwards.
    pub async fn auth_token(&mut self) -> Result<String> {
        if self.session_manager.is_api_token()
            && let Some(token) = self.session_manager.get_bearer_token()
        {
            return Ok(token.to_string());
        }

        if self.session_manager.is_session_expired() || self.session_manager.session_expires_soon()
        {
            self.login_with_configured_credential().await?;
        }

        self.session_manager
            .get_bearer_token()
            .map(|s| s.to_string())
            .ok_or_else(|| ClientError::SessionExpired {
                identifier: self.session_manager.identity().to_string(),
            })
    }

    /// Check if the client is using API token authentication.
    pub fn is_api_token_auth(&self) -> bool {
        self.session_manager.is_api_token()
    }

    /// True when a session token from a login is currently held.
    pub fn has_session(&self) -> bool {
        !self.is_api_token_auth() && !self.session_manager.is_session_expired()
    }

    async fn login_with_configured_credential(&mut self) -> Result<()> {
        let credential = match self.session_manager.strategy() {
            AuthStrategy::Password { identifier, secret } => {
                LoginCredential::new(identifier.clone(), secret.clone())
            }
            AuthStrategy::ApiToken { .. } => {
                return Err(ClientError::AuthFailed(
                    "Cannot log in with API token auth strategy".to_string(),
                ));
            }
        };

        tracing::debug!(identifier = %credential.identifier, "No valid session; logging in");
        match self.login(credential).await? {
            LoginOutcome::Authenticated(_) => Ok(()),
            LoginOutcome::Rejected { error_message, .. } => {
                Err(ClientError::AuthFailed(error_message))
            }
        }
    }
}
