//! Profile configuration types.
//!
//! Responsibilities:
//! - Define `ProfileConfig` for storing named console profiles.
//! - Support partial configuration (all fields optional) so env vars can fill gaps.
//!
//! Does NOT handle:
//! - Profile loading or merging (see `loader` module).
//!
//! Invariants:
//! - All fields are optional to allow partial profile definitions.
//! - Password/token fields use `SecureValue` for flexible secret storage.

use crate::types::audit::AuditUserType;
use crate::types::auth::SecureValue;
use serde::{Deserialize, Serialize};

/// Named console profile as stored in the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Base URL of the console
    pub base_url: Option<String>,
    /// Username for the encrypted login flow
    pub username: Option<String>,
    /// Password for the encrypted login flow
    pub password: Option<SecureValue>,
    /// Pre-issued access token
    pub api_token: Option<SecureValue>,
    pub skip_verify: Option<bool>,
    pub timeout_seconds: Option<u64>,
    pub session_expiry_buffer_seconds: Option<u64>,
    pub session_ttl_seconds: Option<u64>,
    /// Audit page size used when a query does not set one
    pub audit_page_size: Option<u32>,
    pub audit_user_type: Option<AuditUserType>,
    /// Display offset such as `+08:00`
    pub display_utc_offset: Option<String>,
}
