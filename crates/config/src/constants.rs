//! Defaults and limits shared by the config, client and CLI crates.

// Connection

/// Per-request HTTP timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const MAX_TIMEOUT_SECS: u64 = 3600;

pub const DEFAULT_MAX_REDIRECTS: usize = 5;

// Session

/// How long a login's session token is trusted.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
pub const MAX_SESSION_TTL_SECS: u64 = 24 * 3600;

/// A session this close to expiry is replaced by a fresh login before use.
pub const DEFAULT_EXPIRY_BUFFER_SECS: u64 = 60;

// Display

/// Bound on the display timezone offset, either side of UTC.
pub const MAX_UTC_OFFSET_SECS: i32 = 18 * 3600;

// Audit queries

/// Rows per page, as in the console's audit table.
pub const DEFAULT_AUDIT_PAGE_SIZE: u32 = 10;
pub const MAX_AUDIT_PAGE_SIZE: u32 = 1000;
