//! Table formatter entry point.

use anyhow::Result;
use eiam_client::{AuditEventTypeGroup, AuditView, PublicKeyInfo};
use eiam_config::ProfileConfig;
use std::collections::BTreeMap;

use super::audit;
use super::profiles;
use crate::formatters::{Formatter, LoginOutput};

/// Table formatter.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_audit_view(&self, view: &AuditView, detailed: bool) -> Result<String> {
        audit::format_audit_view(view, detailed)
    }

    fn format_event_types(&self, groups: &[AuditEventTypeGroup]) -> Result<String> {
        audit::format_event_types(groups)
    }

    fn format_login(&self, login: &LoginOutput) -> Result<String> {
        Ok(format!(
            "Login succeeded for '{}' at {}",
            login.identifier, login.base_url
        ))
    }

    fn format_public_key(&self, key: &PublicKeyInfo) -> Result<String> {
        Ok(format!(
            "{:<12} {}\n{}",
            "Key ID:",
            key.key_id,
            key.public_key.trim_end()
        ))
    }

    fn format_profiles(&self, profiles: &BTreeMap<String, ProfileConfig>) -> Result<String> {
        profiles::format_profiles(profiles)
    }
}
