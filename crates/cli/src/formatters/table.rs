//! Table formatter implementation.
//!
//! Responsibilities:
//! - Format audit pages, the event-type taxonomy, and profiles as
//!   tab-separated, human-readable tables.
//! - Append a pagination footer to audit pages.
//!
//! Does NOT handle:
//! - Other output formats.

pub use self::imp::TableFormatter;

mod audit;
mod imp;
mod pagination;
mod profiles;
