//! Profile file lookup for the loader.
//!
//! Reads the JSON profile file (the default location unless a path was
//! given) and turns the named profile into a settings layer. Keyring
//! references are resolved here, so a locked keyring fails the load.

use std::path::Path;
use std::time::Duration;

use super::builder::Settings;
use super::error::ConfigError;
use super::offset::parse_utc_offset;
use crate::persistence::{default_config_path, read_config_file};
use crate::types::ProfileConfig;

/// Settings from profile `name`, or `None` when the file or profile is absent.
pub(crate) fn profile_settings(
    name: &str,
    config_path: Option<&Path>,
) -> Result<Option<Settings>, ConfigError> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => {
            default_config_path().map_err(|e| ConfigError::ConfigDirUnavailable(e.to_string()))?
        }
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), profile = name, "Profile file does not exist");
        return Ok(None);
    }

    let file = read_config_file(&path)?;
    file.profiles.get(name).map(settings_from_profile).transpose()
}

fn settings_from_profile(profile: &ProfileConfig) -> Result<Settings, ConfigError> {
    Ok(Settings {
        base_url: profile.base_url.clone(),
        username: profile.username.clone(),
        password: profile.password.as_ref().map(|v| v.resolve()).transpose()?,
        api_token: profile.api_token.as_ref().map(|v| v.resolve()).transpose()?,
        skip_verify: profile.skip_verify,
        timeout: profile.timeout_seconds.map(Duration::from_secs),
        session_expiry_buffer_seconds: profile.session_expiry_buffer_seconds,
        session_ttl_seconds: profile.session_ttl_seconds,
        audit_page_size: profile.audit_page_size,
        audit_user_type: profile.audit_user_type,
        display_utc_offset_seconds: profile
            .display_utc_offset
            .as_deref()
            .map(parse_utc_offset)
            .transpose()?,
    })
}
