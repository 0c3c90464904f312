//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `EIAM_*` environment variables.
//! - Collect them into a settings layer for the loader.
//!
//! Does NOT handle:
//! - Loading from profile files (see profile.rs).
//! - .env file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed.
//! - Invalid values return ConfigError::InvalidValue naming the variable.

use secrecy::SecretString;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::builder::Settings;
use super::error::ConfigError;
use super::offset::parse_utc_offset;
use crate::types::AuditUserType;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_env<T: FromStr>(key: &str, expected: &str) -> Result<Option<T>, ConfigError> {
    env_var_or_none(key)
        .map(|raw| {
            raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: key.to_string(),
                message: expected.to_string(),
            })
        })
        .transpose()
}

/// What the environment contributes to a [`ConfigLoader`](super::ConfigLoader).
pub(crate) struct EnvSettings {
    pub settings: Settings,
    pub config_path: Option<PathBuf>,
    pub profile_name: Option<String>,
}

fn secret(key: &str) -> Option<SecretString> {
    env_var_or_none(key).map(|value| SecretString::new(value.into()))
}

/// Read every `EIAM_*` variable the loader understands.
pub(crate) fn env_settings() -> Result<EnvSettings, ConfigError> {
    let settings = Settings {
        base_url: env_var_or_none("EIAM_BASE_URL"),
        username: env_var_or_none("EIAM_USERNAME"),
        password: secret("EIAM_PASSWORD"),
        api_token: secret("EIAM_API_TOKEN"),
        skip_verify: parse_env("EIAM_SKIP_VERIFY", "must be true or false")?,
        timeout: parse_env::<u64>("EIAM_TIMEOUT", "must be a number of seconds")?
            .map(Duration::from_secs),
        session_expiry_buffer_seconds: parse_env(
            "EIAM_SESSION_EXPIRY_BUFFER",
            "must be a number of seconds",
        )?,
        session_ttl_seconds: parse_env("EIAM_SESSION_TTL", "must be a number of seconds")?,
        audit_page_size: parse_env("EIAM_AUDIT_PAGE_SIZE", "must be a positive number")?,
        audit_user_type: parse_env::<AuditUserType>("EIAM_USER_TYPE", "must be user or app")?,
        display_utc_offset_seconds: env_var_or_none("EIAM_DISPLAY_UTC_OFFSET")
            .map(|raw| parse_utc_offset(&raw))
            .transpose()?,
    };

    Ok(EnvSettings {
        settings,
        config_path: env_var_or_none("EIAM_CONFIG_PATH").map(PathBuf::from),
        profile_name: env_var_or_none("EIAM_PROFILE"),
    })
}
