//! [`EiamClientBuilder`]: assembles an [`EiamClient`] from explicit options or
//! a loaded [`Config`].
//!
//! `build()` requires a base URL and an auth strategy. The HTTP client keeps
//! cookies in memory for its own lifetime only; `skip_verify` is ignored for
//! plain HTTP.

use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

use crate::auth::{AuthStrategy, SessionManager};
use crate::client::EiamClient;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use eiam_config::{
    AuthStrategy as ConfigAuthStrategy, Config,
    constants::{
        DEFAULT_EXPIRY_BUFFER_SECS, DEFAULT_MAX_REDIRECTS, DEFAULT_SESSION_TTL_SECS,
        DEFAULT_TIMEOUT_SECS,
    },
};

/// Options for a new [`EiamClient`]. Everything but the base URL and auth
/// strategy has a default.
///
/// ```rust,ignore
/// let client = EiamClient::builder()
///     .base_url("https://eiam.example.com".to_string())
///     .auth_strategy(AuthStrategy::ApiToken { token })
///     .timeout(Duration::from_secs(60))
///     .build()?;
/// ```
pub struct EiamClientBuilder {
    base_url: Option<String>,
    auth_strategy: Option<AuthStrategy>,
    skip_verify: bool,
    timeout: Duration,
    session_ttl_seconds: u64,
    session_expiry_buffer_seconds: u64,
    display_offset: FixedOffset,
    metrics: Option<MetricsCollector>,
}

impl Default for EiamClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_strategy: None,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECS,
            session_expiry_buffer_seconds: DEFAULT_EXPIRY_BUFFER_SECS,
            display_offset: Utc.fix(),
            metrics: None,
        }
    }
}

impl EiamClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Console root such as `https://eiam.example.com`; trailing slashes are dropped.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    pub fn auth_strategy(mut self, strategy: AuthStrategy) -> Self {
        self.auth_strategy = Some(strategy);
        self
    }

    /// Accept any server certificate. For test consoles with self-signed certs.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// How long a session token is trusted before a fresh login.
    /// Default is 3600 seconds (1 hour).
    pub fn session_ttl_seconds(mut self, ttl: u64) -> Self {
        self.session_ttl_seconds = ttl;
        self
    }

    /// Sessions expiring within this window are renewed before use.
    /// Default is 60 seconds.
    pub fn session_expiry_buffer_seconds(mut self, buffer: u64) -> Self {
        self.session_expiry_buffer_seconds = buffer;
        self
    }

    /// Set the console's display timezone. Default is UTC.
    pub fn display_offset(mut self, offset: FixedOffset) -> Self {
        self.display_offset = offset;
        self
    }

    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Copy connection and auth settings out of a resolved [`Config`].
    pub fn from_config(mut self, config: &Config) -> Self {
        let auth_strategy = match &config.auth.strategy {
            ConfigAuthStrategy::Password { username, password } => AuthStrategy::Password {
                identifier: username.clone(),
                secret: password.clone(),
            },
            ConfigAuthStrategy::ApiToken { token } => AuthStrategy::ApiToken {
                token: token.clone(),
            },
        };

        let offset_seconds = config.connection.display_utc_offset_seconds;
        self.display_offset = FixedOffset::east_opt(offset_seconds).unwrap_or_else(|| {
            tracing::warn!(offset_seconds, "Display UTC offset out of range; using UTC");
            Utc.fix()
        });

        self.base_url = Some(config.connection.base_url.clone());
        self.auth_strategy = Some(auth_strategy);
        self.skip_verify = config.connection.skip_verify;
        self.timeout = config.connection.timeout;
        self.session_ttl_seconds = config.connection.session_ttl_seconds;
        self.session_expiry_buffer_seconds = config.connection.session_expiry_buffer_seconds;
        self
    }

    fn normalize_base_url(url: String) -> String {
        url.trim().trim_end_matches('/').to_string()
    }

    /// # Errors
    /// [`ClientError::InvalidUrl`] for a missing or non-http(s) base URL,
    /// [`ClientError::AuthFailed`] without an auth strategy, and a transport
    /// error if reqwest cannot build its client.
    pub fn build(self) -> Result<EiamClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let base_url = Self::normalize_base_url(base_url);

        let parsed = url::Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ClientError::InvalidUrl(format!(
                "{base_url}: expected an http(s) URL with a host"
            )));
        }

        let auth_strategy = self
            .auth_strategy
            .ok_or_else(|| ClientError::AuthFailed("auth_strategy is required".to_string()))?;

        let mut http_builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS))
            .cookie_store(true)
            .user_agent(concat!("eiam-client/", env!("CARGO_PKG_VERSION")));

        if self.skip_verify {
            if parsed.scheme() == "https" {
                http_builder = http_builder.danger_accept_invalid_certs(true);
            } else {
                tracing::warn!(base_url = %base_url, "skip_verify ignored for a plain HTTP console");
            }
        }

        let http = http_builder.build()?;

        Ok(EiamClient {
            http,
            base_url,
            session_manager: SessionManager::new(auth_strategy),
            session_ttl_seconds: self.session_ttl_seconds,
            session_expiry_buffer_seconds: self.session_expiry_buffer_seconds,
            display_offset: self.display_offset,
            metrics: self.metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_from_config_with_api_token() {
        let config = Config::with_api_token(
            "https://eiam.example.com".to_string(),
            SecretString::new("test-token".to_string().into()),
        );

        let client = EiamClient::builder().from_config(&config).build().unwrap();
        assert_eq!(client.base_url(), "https://eiam.example.com");
        assert!(client.is_api_token_auth());
    }

    #[test]
    fn test_from_config_with_password() {
        let config = Config::with_password(
            "https://eiam.example.com".to_string(),
            "alice".to_string(),
            SecretString::new("correct".to_string().into()),
        );

        let client = EiamClient::builder().from_config(&config).build().unwrap();
        assert!(!client.is_api_token_auth());
        assert_eq!(client.session_manager.identity(), "alice");
    }

    #[test]
    fn test_from_config_preserves_settings() {
        let mut config = Config::with_api_token(
            "https://eiam.example.com".to_string(),
            SecretString::new("test-token".to_string().into()),
        );
        config.connection.skip_verify = true;
        config.connection.timeout = Duration::from_secs(120);
        config.connection.session_ttl_seconds = 7200;
        config.connection.session_expiry_buffer_seconds = 120;
        config.connection.display_utc_offset_seconds = 8 * 3600;

        let builder = EiamClient::builder().from_config(&config);

        assert_eq!(builder.base_url, Some("https://eiam.example.com".to_string()));
        assert!(builder.skip_verify);
        assert_eq!(builder.timeout, Duration::from_secs(120));
        assert_eq!(builder.session_ttl_seconds, 7200);
        assert_eq!(builder.session_expiry_buffer_seconds, 120);
        assert_eq!(builder.display_offset.local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_from_config_out_of_range_offset_falls_back_to_utc() {
        let mut config = Config::with_api_token(
            "https://eiam.example.com".to_string(),
            SecretString::new("test-token".to_string().into()),
        );
        config.connection.display_utc_offset_seconds = 200_000;

        let builder = EiamClient::builder().from_config(&config);
        assert_eq!(builder.display_offset.local_minus_utc(), 0);
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            EiamClientBuilder::normalize_base_url("https://eiam.example.com/".to_string()),
            "https://eiam.example.com"
        );
        assert_eq!(
            EiamClientBuilder::normalize_base_url("https://eiam.example.com//".to_string()),
            "https://eiam.example.com"
        );
        assert_eq!(
            EiamClientBuilder::normalize_base_url("https://eiam.example.com".to_string()),
            "https://eiam.example.com"
        );
    }

    #[test]
    fn test_skip_verify_with_http_url_still_builds() {
        let client = EiamClient::builder()
            .base_url("http://localhost:1989".to_string())
            .auth_strategy(AuthStrategy::ApiToken {
                token: SecretString::new("t".to_string().into()),
            })
            .skip_verify(true)
            .build();
        assert!(client.is_ok());
    }
}
