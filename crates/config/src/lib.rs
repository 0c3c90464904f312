//! Configuration management for the EIAM console client.
//!
//! This crate provides types and loaders for the connection, authentication,
//! and audit-query defaults used by the client library and the CLI. Values
//! come from `.env` files, environment variables, and JSON profile files.

pub mod constants;
mod loader;
pub mod persistence;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none, parse_utc_offset};
pub use persistence::{ConfigFile, ConfigFileError, ProfileStore};
pub use types::{
    AuditDefaults, AuditUserType, AuthConfig, AuthStrategy, Config, ConnectionConfig,
    ProfileConfig, SecureValue,
};
