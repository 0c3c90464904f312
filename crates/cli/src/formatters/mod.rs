//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Provide three output formats: JSON, Table, and CSV.
//! - Implement the `Formatter` trait for audit pages, the event-type taxonomy,
//!   login results, the login public key, and stored profiles.
//!
//! Does NOT handle:
//! - Direct printing to stdout (returns formatted strings).
//!
//! Invariants:
//! - Tables use tab-separation for consistent alignment in standard terminals.
//! - Secrets (passwords, API tokens, session tokens) are never rendered.
//!
//! ## Empty-State Handling
//!
//! | Format | Empty State Behavior | Example |
//! |--------|---------------------|---------|
//! | JSON | Valid empty structure | `{"list": [], ...}` |
//! | CSV | Headers only, no data | `id,event_type,...\n` |
//! | Table | Human message | `No audit events found.` |
//!
//! ## Missing/Null Value Handling
//!
//! JSON keeps `null` (or omits the field); Table and CSV render
//! [`common::DEFAULT_MISSING_VALUE`].

use anyhow::Result;
use eiam_client::{AuditEventTypeGroup, AuditView, PublicKeyInfo};
use eiam_config::{AuditUserType, ProfileConfig};
use serde::Serialize;
use std::collections::BTreeMap;

mod common;
mod csv;
mod json;
mod table;

pub use common::output_result;
pub use csv::CsvFormatter;
pub use json::JsonFormatter;
pub use table::TableFormatter;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
}

impl OutputFormat {
    /// Parse from string.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            _ => anyhow::bail!("Invalid output format: {}. Valid options: json, table, csv", s),
        }
    }
}

/// Result of a successful `login` command.
///
/// The session token itself is never part of the output.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutput {
    pub base_url: String,
    pub identifier: String,
    pub status: &'static str,
}

impl LoginOutput {
    pub fn authenticated(base_url: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            identifier: identifier.into(),
            status: "authenticated",
        }
    }
}

/// A stored profile with its secrets replaced by a marker.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileDisplay {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<&'static str>,
    pub api_token: Option<&'static str>,
    pub skip_verify: Option<bool>,
    pub timeout_seconds: Option<u64>,
    pub audit_page_size: Option<u32>,
    pub audit_user_type: Option<AuditUserType>,
    pub display_utc_offset: Option<String>,
}

/// Marker shown in place of a stored secret.
pub const REDACTED: &str = "****";

impl From<&ProfileConfig> for ProfileDisplay {
    fn from(profile: &ProfileConfig) -> Self {
        Self {
            base_url: profile.base_url.clone(),
            username: profile.username.clone(),
            password: profile.password.as_ref().map(|_| REDACTED),
            api_token: profile.api_token.as_ref().map(|_| REDACTED),
            skip_verify: profile.skip_verify,
            timeout_seconds: profile.timeout_seconds,
            audit_page_size: profile.audit_page_size,
            audit_user_type: profile.audit_user_type,
            display_utc_offset: profile.display_utc_offset.clone(),
        }
    }
}

/// Formatter trait for different output types.
pub trait Formatter {
    /// Format one page of audit records.
    ///
    /// `detailed` adds the expanded-row fields (user type, content, result, actor).
    fn format_audit_view(&self, view: &AuditView, detailed: bool) -> Result<String>;

    /// Format the grouped event-type taxonomy.
    fn format_event_types(&self, groups: &[AuditEventTypeGroup]) -> Result<String>;

    /// Format a successful login.
    fn format_login(&self, login: &LoginOutput) -> Result<String>;

    /// Format the login public key.
    fn format_public_key(&self, key: &PublicKeyInfo) -> Result<String>;

    /// Format stored profiles with secrets redacted.
    fn format_profiles(&self, profiles: &BTreeMap<String, ProfileConfig>) -> Result<String>;
}

/// Get a formatter for the specified output format.
pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

#[cfg(test)]
mod tests;
