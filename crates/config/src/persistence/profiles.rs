//! The profile file: a JSON `{ "profiles": { <name>: {...} } }` document.
//!
//! Saves replace the file through a sibling `.tmp` and a rename. A file that
//! cannot be read or parsed is moved aside as `<name>.corrupt.<unix-secs>`
//! rather than overwritten. Keyring entries a deleted profile points to are
//! removed on a best-effort basis.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::path::default_config_path;
use crate::types::{KEYRING_SERVICE, ProfileConfig, SecureValue};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Keyed by profile name; sorted so saved files diff cleanly.
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Cannot read profile file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Profile file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub(crate) fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigFileError> {
    let path_buf = || path.to_path_buf();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigFileError::Parse {
        path: path_buf(),
        source,
    })
}

/// Move an unusable profile file out of the way and return where it went.
fn move_corrupt_aside(path: &Path) -> std::io::Result<PathBuf> {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let backup = path.with_extension(format!("corrupt.{secs}"));
    std::fs::rename(path, &backup)?;
    Ok(backup)
}

/// In-memory copy of the profile file; every mutation is saved immediately.
pub struct ProfileStore {
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl ProfileStore {
    pub fn open_default() -> Result<Self> {
        Self::open(default_config_path()?)
    }

    /// A missing file opens as an empty store, as does a corrupt one after
    /// it has been moved aside.
    pub fn open(config_path: PathBuf) -> Result<Self> {
        let config_file = if !config_path.exists() {
            ConfigFile::default()
        } else {
            read_config_file(&config_path).or_else(|err| {
                let backup = move_corrupt_aside(&config_path)
                    .context("Failed to move the corrupt profile file aside")?;
                tracing::warn!(
                    error = %err,
                    backup = %backup.display(),
                    "Unreadable profile file moved aside; starting with no profiles"
                );
                anyhow::Ok(ConfigFile::default())
            })?
        };

        Ok(Self {
            config_path,
            config_file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn list_profiles(&self) -> &BTreeMap<String, ProfileConfig> {
        &self.config_file.profiles
    }

    pub fn profile(&self, name: &str) -> Option<&ProfileConfig> {
        self.config_file.profiles.get(name)
    }

    /// Insert or replace `name`.
    pub fn save_profile(&mut self, name: &str, profile: ProfileConfig) -> Result<()> {
        self.config_file.profiles.insert(name.to_owned(), profile);
        self.persist()
    }

    pub fn delete_profile(&mut self, name: &str) -> Result<()> {
        let Some(removed) = self.config_file.profiles.remove(name) else {
            anyhow::bail!("Profile '{name}' not found");
        };

        let accounts = [removed.password, removed.api_token]
            .into_iter()
            .flatten()
            .filter_map(|value| match value {
                SecureValue::Keyring { keyring_account } => Some(keyring_account),
                SecureValue::Plain(_) => None,
            });
        for account in accounts {
            let deleted = keyring::Entry::new(KEYRING_SERVICE, &account)
                .and_then(|entry| entry.delete_credential());
            if let Err(e) = deleted {
                tracing::debug!(account = %account, error = %e, "Keyring entry not removed");
            }
        }

        self.persist()
    }

    /// Keyring account `<profile>-<username>`.
    pub fn store_password_in_keyring(
        &self,
        profile_name: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<SecureValue> {
        store_in_keyring(format!("{profile_name}-{username}"), password)
    }

    /// Keyring account `<profile>-token`.
    pub fn store_token_in_keyring(
        &self,
        profile_name: &str,
        token: &SecretString,
    ) -> Result<SecureValue> {
        store_in_keyring(format!("{profile_name}-token"), token)
    }

    fn persist(&self) -> Result<()> {
        if let Some(dir) = self.config_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let json = serde_json::to_string_pretty(&self.config_file)?;
        let staging = self.config_path.with_extension("tmp");
        std::fs::write(&staging, json)
            .with_context(|| format!("Failed to write {}", staging.display()))?;
        std::fs::rename(&staging, &self.config_path)
            .with_context(|| format!("Failed to replace {}", self.config_path.display()))?;

        tracing::debug!(path = %self.config_path.display(), "Profile file saved");
        Ok(())
    }
}

fn store_in_keyring(keyring_account: String, secret: &SecretString) -> Result<SecureValue> {
    keyring::Entry::new(KEYRING_SERVICE, &keyring_account)?
        .set_password(secret.expose_secret())
        .with_context(|| format!("Failed to store '{keyring_account}' in the keyring"))?;
    Ok(SecureValue::Keyring { keyring_account })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(value: &str) -> SecureValue {
        SecureValue::Plain(SecretString::new(value.to_string().into()))
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(temp_dir.path().join("config.json")).unwrap();
        assert!(store.list_profiles().is_empty());
    }

    #[test]
    fn test_save_and_reopen_profile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let mut store = ProfileStore::open(path.clone()).unwrap();
        store
            .save_profile(
                "dev",
                ProfileConfig {
                    base_url: Some("https://eiam.example.com".to_string()),
                    username: Some("alice".to_string()),
                    password: Some(plain("correct")),
                    audit_page_size: Some(20),
                    ..ProfileConfig::default()
                },
            )
            .unwrap();

        assert!(!path.with_extension("tmp").exists());

        let reopened = ProfileStore::open(path).unwrap();
        let profile = reopened.profile("dev").unwrap();
        assert_eq!(profile.username.as_deref(), Some("alice"));
        assert_eq!(profile.audit_page_size, Some(20));
        match &profile.password {
            Some(SecureValue::Plain(secret)) => assert_eq!(secret.expose_secret(), "correct"),
            other => panic!("Expected plain password, got {other:?}"),
        }
    }

    #[test]
    fn test_delete_profile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");

        let mut store = ProfileStore::open(path.clone()).unwrap();
        store.save_profile("dev", ProfileConfig::default()).unwrap();
        store.save_profile("prod", ProfileConfig::default()).unwrap();
        store.delete_profile("dev").unwrap();

        let reopened = ProfileStore::open(path).unwrap();
        assert!(reopened.profile("dev").is_none());
        assert!(reopened.profile("prod").is_some());
        assert!(store.delete_profile("dev").is_err());
    }

    #[test]
    fn test_corrupt_file_is_backed_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ definitely not json").unwrap();

        let store = ProfileStore::open(path.clone()).unwrap();
        assert!(store.list_profiles().is_empty());
        assert!(!path.exists());

        let backups: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains("corrupt"))
            .collect();
        assert_eq!(backups.len(), 1);
    }

    #[test]
    fn test_read_config_file_parse_error_carries_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "42").unwrap();

        match read_config_file(&path) {
            Err(ConfigFileError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected parse error, got {other:?}"),
        }
    }
}
