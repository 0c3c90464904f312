//! Where the profile file lives and how it is read and written.
//!
//! Merging profiles with other configuration sources is the loader's job.

mod path;
mod profiles;

pub use path::default_config_path;
pub use profiles::{ConfigFile, ConfigFileError, ProfileStore};

pub(crate) use profiles::read_config_file;
