//! Audit query defaults.
//!
//! Invariants:
//! - `page_size` is validated by the loader to lie in `1..=MAX_AUDIT_PAGE_SIZE`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_AUDIT_PAGE_SIZE;

/// Which population of actors an audit query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditUserType {
    /// Console and portal users.
    #[default]
    User,
    /// Applications acting through the API.
    App,
}

impl AuditUserType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AuditUserType::User => "user",
            AuditUserType::App => "app",
        }
    }
}

impl fmt::Display for AuditUserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditUserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(AuditUserType::User),
            "app" => Ok(AuditUserType::App),
            other => Err(format!("unknown user type '{other}' (expected user or app)")),
        }
    }
}

/// Defaults applied to audit queries that do not specify them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditDefaults {
    pub page_size: u32,
    pub user_type: AuditUserType,
}

impl Default for AuditDefaults {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_AUDIT_PAGE_SIZE,
            user_type: AuditUserType::User,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_parse() {
        assert_eq!("user".parse::<AuditUserType>(), Ok(AuditUserType::User));
        assert_eq!(" APP ".parse::<AuditUserType>(), Ok(AuditUserType::App));
        assert!("robot".parse::<AuditUserType>().is_err());
    }

    #[test]
    fn test_defaults_match_console_table() {
        let defaults = AuditDefaults::default();
        assert_eq!(defaults.page_size, 10);
        assert_eq!(defaults.user_type, AuditUserType::User);
    }
}
