//! Value types shared by the loader, the profile file and the client.
//!
//! Secrets are held as `secrecy::SecretString` so `Debug` never prints them.
//! Keyring entries always use [`KEYRING_SERVICE`].

mod audit;
mod auth;
mod connection;
mod profile;

pub use audit::{AuditDefaults, AuditUserType};
pub use auth::{AuthConfig, AuthStrategy, KEYRING_SERVICE, SecureValue};
pub use connection::{Config, ConnectionConfig};
pub use profile::ProfileConfig;
