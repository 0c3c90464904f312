//! CSV output (RFC 4180). Nested record fields such as geo location and user
//! agent are flattened into their own columns.

pub use self::imp::CsvFormatter;

mod audit;
mod imp;
mod profiles;
