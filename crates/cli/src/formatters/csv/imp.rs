//! CSV formatter entry point.

use anyhow::Result;
use eiam_client::{AuditEventTypeGroup, AuditView, PublicKeyInfo};
use eiam_config::ProfileConfig;
use std::collections::BTreeMap;

use super::audit;
use super::profiles;
use crate::formatters::common::{build_csv_header, build_csv_row};
use crate::formatters::{Formatter, LoginOutput};

/// CSV formatter.
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_audit_view(&self, view: &AuditView, detailed: bool) -> Result<String> {
        audit::format_audit_view(view, detailed)
    }

    fn format_event_types(&self, groups: &[AuditEventTypeGroup]) -> Result<String> {
        audit::format_event_types(groups)
    }

    fn format_login(&self, login: &LoginOutput) -> Result<String> {
        let mut csv = build_csv_header(&["base_url", "identifier", "status"]);
        csv.push_str(&build_csv_row(&[
            login.base_url.clone(),
            login.identifier.clone(),
            login.status.to_string(),
        ]));
        Ok(csv)
    }

    fn format_public_key(&self, key: &PublicKeyInfo) -> Result<String> {
        let mut csv = build_csv_header(&["key_id", "public_key"]);
        csv.push_str(&build_csv_row(&[
            key.key_id.clone(),
            key.public_key.clone(),
        ]));
        Ok(csv)
    }

    fn format_profiles(&self, profiles: &BTreeMap<String, ProfileConfig>) -> Result<String> {
        profiles::format_profiles(profiles)
    }
}
