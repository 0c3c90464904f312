//! Profiles table formatter.

use anyhow::Result;
use eiam_config::ProfileConfig;
use std::collections::BTreeMap;

use crate::formatters::ProfileDisplay;

const NOT_SET: &str = "(not set)";

/// Format all profiles as a table, one block per profile.
pub fn format_profiles(profiles: &BTreeMap<String, ProfileConfig>) -> Result<String> {
    if profiles.is_empty() {
        return Ok(
            "No profiles configured. Use 'eiam-cli config set <profile-name>' to add one."
                .to_string(),
        );
    }

    let mut output = format!("{:<20} {:<40} {:<15}\n", "Profile", "Base URL", "Username");
    output.push_str(&format!("{}\n", "-".repeat(75)));

    for (name, profile) in profiles {
        let display = ProfileDisplay::from(profile);
        let base_url = display.base_url.as_deref().unwrap_or("-");
        let username = display.username.as_deref().unwrap_or("-");
        output.push_str(&format!("{:<20} {:<40} {:<15}\n", name, base_url, username));

        let mut details = Vec::new();
        if let Some(marker) = display.password {
            details.push(format!("password={marker}"));
        }
        if let Some(marker) = display.api_token {
            details.push(format!("api_token={marker}"));
        }
        if let Some(skip) = display.skip_verify {
            details.push(format!("skip_verify={skip}"));
        }
        if let Some(timeout) = display.timeout_seconds {
            details.push(format!("timeout={timeout}s"));
        }
        if let Some(size) = display.audit_page_size {
            details.push(format!("page_size={size}"));
        }
        if let Some(user_type) = display.audit_user_type {
            details.push(format!("user_type={user_type}"));
        }
        if let Some(offset) = &display.display_utc_offset {
            details.push(format!("utc_offset={offset}"));
        }
        let details = if details.is_empty() {
            NOT_SET.to_string()
        } else {
            details.join(", ")
        };
        output.push_str(&format!("{:<20} {}\n", "", details));
    }

    Ok(output)
}
