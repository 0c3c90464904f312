//! Who the client logs in as, and the session token a login produced.

use eiam_config::constants::DEFAULT_EXPIRY_BUFFER_SECS;
use secrecy::{ExposeSecret, SecretString};
use std::time::{Duration, Instant};

use crate::models::SessionToken;

/// Strategy for authenticating with the EIAM console.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Identifier and password.
    /// The client runs the encrypted login flow and keeps the session token.
    Password {
        identifier: String,
        secret: SecretString,
    },
    /// Pre-issued bearer token; no login or session management.
    ApiToken { token: SecretString },
}

/// Holds the auth strategy and the current session token.
#[derive(Debug)]
pub struct SessionManager {
    auth_strategy: AuthStrategy,
    session: Option<ActiveSession>,
}

#[derive(Debug, Clone)]
struct ActiveSession {
    token: SessionToken,
    expires_at: Option<Instant>,
    expiry_buffer: Duration,
}

impl ActiveSession {
    fn new(token: SessionToken, ttl_seconds: Option<u64>, expiry_buffer_seconds: Option<u64>) -> Self {
        Self {
            token,
            expires_at: ttl_seconds.map(|ttl| Instant::now() + Duration::from_secs(ttl)),
            expiry_buffer: Duration::from_secs(
                expiry_buffer_seconds.unwrap_or(DEFAULT_EXPIRY_BUFFER_SECS),
            ),
        }
    }

    /// Time left before expiry; `None` for a session without a TTL.
    fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }

    fn will_expire_soon(&self) -> bool {
        self.remaining().is_some_and(|left| left < self.expiry_buffer)
    }
}

impl SessionManager {
    pub fn new(strategy: AuthStrategy) -> Self {
        Self {
            auth_strategy: strategy,
            session: None,
        }
    }

    pub fn strategy(&self) -> &AuthStrategy {
        &self.auth_strategy
    }

    pub fn is_api_token(&self) -> bool {
        matches!(self.auth_strategy, AuthStrategy::ApiToken { .. })
    }

    /// Name shown in errors: the login identifier, or `api-token`.
    pub fn identity(&self) -> &str {
        match &self.auth_strategy {
            AuthStrategy::Password { identifier, .. } => identifier,
            AuthStrategy::ApiToken { .. } => "api-token",
        }
    }

    /// The configured API token, or the current session token after a login.
    pub fn get_bearer_token(&self) -> Option<&str> {
        match &self.auth_strategy {
            AuthStrategy::ApiToken { token } => Some(token.expose_secret()),
            AuthStrategy::Password { .. } => self
                .session
                .as_ref()
                .map(|s| s.token.secret().expose_secret()),
        }
    }

    /// Keep the token from a successful login. Without `ttl_seconds` it never
    /// expires; `expiry_buffer_seconds` defaults to 60.
    pub fn set_session_token(
        &mut self,
        token: SessionToken,
        ttl_seconds: Option<u64>,
        expiry_buffer_seconds: Option<u64>,
    ) {
        self.session = Some(ActiveSession::new(token, ttl_seconds, expiry_buffer_seconds));
    }

    /// Token auth never needs a login; password auth without a session always does.
    fn check_session<F>(&self, check: F) -> bool
    where
        F: FnOnce(&ActiveSession) -> bool,
    {
        if self.is_api_token() {
            return false;
        }
        self.session.as_ref().map(check).unwrap_or(true)
    }

    pub fn is_session_expired(&self) -> bool {
        self.check_session(|s| s.is_expired())
    }

    pub fn session_expires_soon(&self) -> bool {
        self.check_session(|s| s.will_expire_soon())
    }

    /// Drop the session so the next request logs in again.
    pub fn clear_session(&mut self) {
        self.session = None;
    }
}
