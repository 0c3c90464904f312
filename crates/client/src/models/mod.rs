//! Data models for EIAM console API responses.
//!
//! Types are organized by resource in submodules and re-exported here
//! for convenient access.

pub mod audit;
pub mod auth;
pub mod common;

pub use audit::{
    AuditEventRecord, AuditEventType, AuditEventTypeGroup, AuditQuery, EventStatus, GeoLocation,
    SortField, SortOrder, TimeRange, UserAgent, parse_query_time,
};
pub use auth::{LoginCredential, LoginOutcome, PublicKeyInfo, SealedCredential, SessionToken};
pub use common::{ApiEnvelope, Page};

pub(crate) use common::WirePage;
