//! JSON formatter implementation.
//!
//! Responsibilities:
//! - Format all output types as pretty-printed JSON.
//!
//! Does NOT handle:
//! - Other output formats.
//! - The `detailed` flag: JSON always carries every field the record has.

use crate::formatters::{Formatter, LoginOutput, ProfileDisplay};
use anyhow::Result;
use eiam_client::{AuditEventTypeGroup, AuditView, PublicKeyInfo};
use eiam_config::ProfileConfig;
use std::collections::BTreeMap;

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_audit_view(&self, view: &AuditView, _detailed: bool) -> Result<String> {
        Ok(serde_json::to_string_pretty(&view.page)?)
    }

    fn format_event_types(&self, groups: &[AuditEventTypeGroup]) -> Result<String> {
        Ok(serde_json::to_string_pretty(groups)?)
    }

    fn format_login(&self, login: &LoginOutput) -> Result<String> {
        Ok(serde_json::to_string_pretty(login)?)
    }

    fn format_public_key(&self, key: &PublicKeyInfo) -> Result<String> {
        Ok(serde_json::to_string_pretty(key)?)
    }

    fn format_profiles(&self, profiles: &BTreeMap<String, ProfileConfig>) -> Result<String> {
        let display: BTreeMap<&String, ProfileDisplay> = profiles
            .iter()
            .map(|(name, profile)| (name, ProfileDisplay::from(profile)))
            .collect();
        Ok(serde_json::to_string_pretty(&serde_json::json!({
            "profiles": display
        }))?)
    }
}
