//! [`Config`], the resolved settings a client is built from, and its
//! connection half.
//!
//! Durations serialize as whole seconds.

use crate::constants::{DEFAULT_EXPIRY_BUFFER_SECS, DEFAULT_SESSION_TTL_SECS, DEFAULT_TIMEOUT_SECS};
use crate::types::audit::AuditDefaults;
use crate::types::auth::{AuthConfig, AuthStrategy};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_secs())
}

fn deserialize_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Console root, no trailing slash.
    pub base_url: String,
    pub skip_verify: bool,
    #[serde(serialize_with = "serialize_secs", deserialize_with = "deserialize_secs")]
    pub timeout: Duration,
    #[serde(default = "default_session_expiry_buffer")]
    pub session_expiry_buffer_seconds: u64,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
    /// Offset event times are rendered in, seconds east of UTC.
    #[serde(default)]
    pub display_utc_offset_seconds: i32,
}

fn default_session_expiry_buffer() -> u64 {
    DEFAULT_EXPIRY_BUFFER_SECS
}

fn default_session_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

impl ConnectionConfig {
    /// Defaults everywhere except the URL.
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_expiry_buffer_seconds: default_session_expiry_buffer(),
            session_ttl_seconds: default_session_ttl(),
            display_utc_offset_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub audit: AuditDefaults,
}

impl Config {
    fn new(base_url: String, strategy: AuthStrategy) -> Self {
        Self {
            connection: ConnectionConfig::with_base_url(base_url),
            auth: AuthConfig { strategy },
            audit: AuditDefaults::default(),
        }
    }

    pub fn with_api_token(base_url: String, token: SecretString) -> Self {
        Self::new(base_url, AuthStrategy::ApiToken { token })
    }

    pub fn with_password(base_url: String, username: String, password: SecretString) -> Self {
        Self::new(base_url, AuthStrategy::Password { username, password })
    }
}
