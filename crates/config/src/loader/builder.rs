//! `ConfigLoader`: layered resolution of a [`Config`].
//!
//! Every source produces a [`Settings`] layer. Builder methods and the
//! environment overwrite what they provide; the profile only fills values no
//! other source set, so it stays the lowest layer whichever order the
//! sources are applied in. `build()` applies defaults and validates.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use super::env::env_settings;
use super::error::ConfigError;
use super::profile::profile_settings;
use crate::constants::{
    DEFAULT_AUDIT_PAGE_SIZE, DEFAULT_EXPIRY_BUFFER_SECS, DEFAULT_SESSION_TTL_SECS,
    DEFAULT_TIMEOUT_SECS, MAX_AUDIT_PAGE_SIZE, MAX_SESSION_TTL_SECS, MAX_TIMEOUT_SECS,
};
use crate::types::{
    AuditDefaults, AuditUserType, AuthConfig, AuthStrategy, Config, ConnectionConfig,
};

/// One source's worth of optional values.
#[derive(Default)]
pub(crate) struct Settings {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub api_token: Option<SecretString>,
    pub skip_verify: Option<bool>,
    pub timeout: Option<Duration>,
    pub session_expiry_buffer_seconds: Option<u64>,
    pub session_ttl_seconds: Option<u64>,
    pub audit_page_size: Option<u32>,
    pub audit_user_type: Option<AuditUserType>,
    pub display_utc_offset_seconds: Option<i32>,
}

macro_rules! for_each_setting {
    ($apply:ident, $target:expr, $layer:expr) => {
        $apply!($target, $layer, base_url);
        $apply!($target, $layer, username);
        $apply!($target, $layer, password);
        $apply!($target, $layer, api_token);
        $apply!($target, $layer, skip_verify);
        $apply!($target, $layer, timeout);
        $apply!($target, $layer, session_expiry_buffer_seconds);
        $apply!($target, $layer, session_ttl_seconds);
        $apply!($target, $layer, audit_page_size);
        $apply!($target, $layer, audit_user_type);
        $apply!($target, $layer, display_utc_offset_seconds);
    };
}

macro_rules! overwrite {
    ($target:expr, $layer:expr, $field:ident) => {
        if $layer.$field.is_some() {
            $target.$field = $layer.$field;
        }
    };
}

macro_rules! fill {
    ($target:expr, $layer:expr, $field:ident) => {
        if $target.$field.is_none() {
            $target.$field = $layer.$field;
        }
    };
}

impl Settings {
    /// Values in `layer` win over the current ones.
    pub(crate) fn overlay(&mut self, layer: Settings) {
        for_each_setting!(overwrite, self, layer);
    }

    /// Values in `layer` are used only where nothing is set yet.
    pub(crate) fn underlay(&mut self, layer: Settings) {
        for_each_setting!(fill, self, layer);
    }

    /// Base URL plus either a token or a username and password.
    fn is_complete(&self) -> bool {
        let has_auth =
            self.api_token.is_some() || (self.username.is_some() && self.password.is_some());
        self.base_url.is_some() && has_auth
    }
}

#[derive(Default)]
pub struct ConfigLoader {
    pub(crate) settings: Settings,
    profile_name: Option<String>,
    /// Requested profile that was not in the file; reported by `build()`
    /// only if the other sources are incomplete.
    profile_missing: Option<String>,
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `.env` from the working directory into the process environment.
    ///
    /// Skipped when `DOTENV_DISABLED` is `1` or `true`. A missing file is fine.
    ///
    /// # Errors
    /// [`ConfigError::DotenvParse`] on bad syntax, [`ConfigError::DotenvIo`]
    /// when the file exists but cannot be read.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        let disabled = matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("1" | "true")
        );
        if disabled {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(self),
            Err(dotenvy::Error::Io(e)) => Err(ConfigError::DotenvIo { kind: e.kind() }),
            Err(dotenvy::Error::LineParse(_, error_index)) => {
                Err(ConfigError::DotenvParse { error_index })
            }
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    pub fn with_profile_name(mut self, name: String) -> Self {
        self.profile_name = Some(name);
        self
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Active profile name, from the CLI or `EIAM_PROFILE`.
    pub fn profile_name(&self) -> Option<&String> {
        self.profile_name.as_ref()
    }

    /// Read `EIAM_*` variables. `EIAM_CONFIG_PATH` and `EIAM_PROFILE` only
    /// apply when no path or profile was chosen explicitly.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        let env = env_settings()?;
        self.settings.overlay(env.settings);
        if self.config_path.is_none() {
            self.config_path = env.config_path;
        }
        if self.profile_name.is_none() {
            self.profile_name = env.profile_name;
        }
        Ok(self)
    }

    /// Fill unset values from the active profile, if any.
    pub fn from_profile(mut self) -> Result<Self, ConfigError> {
        let Some(name) = self.profile_name.clone() else {
            return Ok(self);
        };
        match profile_settings(&name, self.config_path.as_deref())? {
            Some(layer) => self.settings.underlay(layer),
            None => self.profile_missing = Some(name),
        }
        Ok(self)
    }

    pub fn with_base_url(mut self, url: String) -> Self {
        self.settings.base_url = Some(url);
        self
    }

    pub fn with_username(mut self, username: String) -> Self {
        self.settings.username = Some(username);
        self
    }

    pub fn with_password(mut self, password: String) -> Self {
        self.settings.password = Some(SecretString::new(password.into()));
        self
    }

    pub fn with_api_token(mut self, token: String) -> Self {
        self.settings.api_token = Some(SecretString::new(token.into()));
        self
    }

    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.settings.skip_verify = Some(skip);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = Some(timeout);
        self
    }

    pub fn with_audit_page_size(mut self, page_size: u32) -> Self {
        self.settings.audit_page_size = Some(page_size);
        self
    }

    pub fn with_audit_user_type(mut self, user_type: AuditUserType) -> Self {
        self.settings.audit_user_type = Some(user_type);
        self
    }

    /// Offset of the console's display timezone, in seconds east of UTC.
    pub fn with_display_utc_offset_seconds(mut self, seconds: i32) -> Self {
        self.settings.display_utc_offset_seconds = Some(seconds);
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let Self {
            settings,
            profile_missing,
            ..
        } = self;

        if let Some(name) = profile_missing
            && !settings.is_complete()
        {
            return Err(ConfigError::ProfileNotFound(name));
        }

        let base_url = match settings.base_url.as_deref() {
            Some(raw) => normalize_base_url(raw)?,
            None => return Err(ConfigError::MissingBaseUrl),
        };

        // A configured API token wins over a password login
        let strategy = match (settings.api_token, settings.username, settings.password) {
            (Some(token), _, _) => AuthStrategy::ApiToken { token },
            (None, Some(username), Some(password)) => AuthStrategy::Password { username, password },
            _ => return Err(ConfigError::MissingAuth),
        };

        let connection = ConnectionConfig {
            base_url,
            skip_verify: settings.skip_verify.unwrap_or(false),
            timeout: settings
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            session_expiry_buffer_seconds: settings
                .session_expiry_buffer_seconds
                .unwrap_or(DEFAULT_EXPIRY_BUFFER_SECS),
            session_ttl_seconds: settings
                .session_ttl_seconds
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),
            display_utc_offset_seconds: settings.display_utc_offset_seconds.unwrap_or(0),
        };
        check_connection(&connection)?;

        let audit = AuditDefaults {
            page_size: settings.audit_page_size.unwrap_or(DEFAULT_AUDIT_PAGE_SIZE),
            user_type: settings.audit_user_type.unwrap_or_default(),
        };
        if !(1..=MAX_AUDIT_PAGE_SIZE).contains(&audit.page_size) {
            return Err(ConfigError::InvalidPageSize {
                message: format!(
                    "must be between 1 and {MAX_AUDIT_PAGE_SIZE} (got {})",
                    audit.page_size
                ),
            });
        }

        Ok(Config {
            connection,
            auth: AuthConfig { strategy },
            audit,
        })
    }
}

fn check_connection(connection: &ConnectionConfig) -> Result<(), ConfigError> {
    let timeout = connection.timeout.as_secs();
    if !(1..=MAX_TIMEOUT_SECS).contains(&timeout) {
        return Err(ConfigError::InvalidTimeout {
            message: format!("must be between 1 and {MAX_TIMEOUT_SECS} seconds (got {timeout})"),
        });
    }

    let (ttl, buffer) = (
        connection.session_ttl_seconds,
        connection.session_expiry_buffer_seconds,
    );
    if ttl <= buffer {
        return Err(ConfigError::InvalidSessionTtl {
            message: format!("TTL ({ttl}s) must exceed the expiry buffer ({buffer}s)"),
        });
    }
    if ttl > MAX_SESSION_TTL_SECS {
        return Err(ConfigError::InvalidSessionTtl {
            message: format!("TTL ({ttl}s) exceeds the {MAX_SESSION_TTL_SECS}s maximum"),
        });
    }

    Ok(())
}

/// Trim, require an absolute http(s) URL with a host, and drop trailing slashes.
/// Blank input counts as missing.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }

    let invalid = |message: String| ConfigError::InvalidValue {
        var: "base_url".into(),
        message: format!("{message} (e.g. https://eiam.example.com)"),
    };

    let parsed = url::Url::parse(trimmed).map_err(|e| invalid(format!("not an absolute URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "scheme must be http or https, got {}",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("a host is required".to_string()));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_and_underlay() {
        let mut settings = Settings {
            base_url: Some("https://a.example.com".to_string()),
            ..Default::default()
        };

        settings.underlay(Settings {
            base_url: Some("https://profile.example.com".to_string()),
            audit_page_size: Some(50),
            ..Default::default()
        });
        assert_eq!(settings.base_url.as_deref(), Some("https://a.example.com"));
        assert_eq!(settings.audit_page_size, Some(50));

        settings.overlay(Settings {
            base_url: Some("https://env.example.com".to_string()),
            ..Default::default()
        });
        assert_eq!(settings.base_url.as_deref(), Some("https://env.example.com"));
        assert_eq!(settings.audit_page_size, Some(50));
    }
}
