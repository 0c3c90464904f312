//! Errors raised while resolving a [`crate::Config`].
//!
//! `.env` failures carry only a byte position or an I/O kind. The offending
//! line may hold a secret and is never echoed.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

use crate::persistence::ConfigFileError;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable or flag that does not parse.
    #[error("{var} has an invalid value: {message}")]
    InvalidValue { var: String, message: String },

    #[error("No console URL configured. Set EIAM_BASE_URL, pass --base-url, or select a profile")]
    MissingBaseUrl,

    #[error("No credentials configured. Provide a username and password or an API token")]
    MissingAuth,

    #[error("Cannot locate the configuration directory: {0}")]
    ConfigDirUnavailable(String),

    #[error("Cannot read profile file {path}")]
    ConfigFileRead { path: PathBuf },

    #[error("Profile file {path} is not valid JSON")]
    ConfigFileParse { path: PathBuf },

    #[error("No profile named '{0}' in the profile file")]
    ProfileNotFound(String),

    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("invalid timeout: {message}")]
    InvalidTimeout { message: String },

    #[error("invalid session TTL: {message}")]
    InvalidSessionTtl { message: String },

    #[error("invalid audit page size: {message}")]
    InvalidPageSize { message: String },

    #[error("invalid UTC offset '{value}': expected Z, UTC, or +HH:MM within +/-18:00")]
    InvalidUtcOffset { value: String },

    #[error(".env parse error at byte {error_index} (set DOTENV_DISABLED=1 to skip .env)")]
    DotenvParse { error_index: usize },

    #[error(".env could not be read: {kind}")]
    DotenvIo { kind: ErrorKind },

    #[error(".env could not be loaded (set DOTENV_DISABLED=1 to skip .env)")]
    DotenvUnknown,
}

impl From<ConfigFileError> for ConfigError {
    fn from(error: ConfigFileError) -> Self {
        match error {
            ConfigFileError::Read { path, .. } => Self::ConfigFileRead { path },
            ConfigFileError::Parse { path, .. } => Self::ConfigFileParse { path },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_errors_keep_path() {
        let err: ConfigError = ConfigFileError::Parse {
            path: PathBuf::from("/tmp/eiam/config.json"),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        }
        .into();
        assert!(err.to_string().contains("/tmp/eiam/config.json"));
    }

    #[test]
    fn test_dotenv_error_names_the_escape_hatch() {
        let err = ConfigError::DotenvParse { error_index: 12 };
        assert!(err.to_string().contains("DOTENV_DISABLED=1"));
        assert!(err.to_string().contains("12"));
    }
}
