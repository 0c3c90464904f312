//! Resolves a [`crate::Config`] from `.env`, `EIAM_*` variables, a JSON
//! profile and explicit builder calls.
//!
//! Precedence, highest first: builder methods, environment, profile, then
//! built-in defaults. `.env` is read only when [`ConfigLoader::load_dotenv`]
//! is called and `DOTENV_DISABLED` is unset. Writing profiles back belongs to
//! `persistence`; keyring lookups go through `SecureValue::resolve()`.

mod builder;
mod env;
mod error;
mod offset;
mod profile;

pub use builder::ConfigLoader;
pub use env::env_var_or_none;
pub use error::ConfigError;
pub use offset::parse_utc_offset;

#[cfg(test)]
mod tests;
