//! Path helpers for the configuration file location.

use std::path::PathBuf;

use anyhow::Context;

/// Returns the default path to the configuration file.
///
/// - Linux/macOS: `~/.config/eiam-cli/config.json`
/// - Windows: `%AppData%\eiam-cli\config.json`
pub fn default_config_path() -> Result<PathBuf, anyhow::Error> {
    let proj_dirs = directories::ProjectDirs::from("", "", "eiam-cli")
        .context("Failed to determine project directories")?;

    Ok(proj_dirs.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_ends_with_app_dir() {
        let path = default_config_path().unwrap();
        assert!(path.ends_with("config.json"));
        assert!(path.to_string_lossy().contains("eiam-cli"));
    }
}
