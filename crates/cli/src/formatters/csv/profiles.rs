//! Profiles CSV formatter.

use anyhow::Result;
use eiam_config::ProfileConfig;
use std::collections::BTreeMap;

use crate::formatters::ProfileDisplay;
use crate::formatters::common::{build_csv_header, build_csv_row};

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Format all profiles as CSV with secrets redacted.
pub fn format_profiles(profiles: &BTreeMap<String, ProfileConfig>) -> Result<String> {
    let mut csv = build_csv_header(&[
        "profile",
        "base_url",
        "username",
        "password",
        "api_token",
        "skip_verify",
        "timeout_seconds",
        "audit_page_size",
        "audit_user_type",
        "display_utc_offset",
    ]);

    for (name, profile) in profiles {
        let display = ProfileDisplay::from(profile);
        csv.push_str(&build_csv_row(&[
            name.clone(),
            opt(display.base_url),
            opt(display.username),
            opt(display.password),
            opt(display.api_token),
            opt(display.skip_verify),
            opt(display.timeout_seconds),
            opt(display.audit_page_size),
            opt(display.audit_user_type),
            opt(display.display_utc_offset),
        ]));
    }

    Ok(csv)
}
