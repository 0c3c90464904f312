//! EIAM console API client.
//!
//! This crate provides a type-safe client for the EIAM console's login and
//! audit APIs. It supports the encrypted password login flow with an in-memory
//! session, and pre-issued API tokens.

mod auth;
pub mod client;
pub mod crypto;
pub mod error;
pub mod metrics;
pub mod metrics_exporter;
pub mod models;
mod serde_helpers;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod tracing;

pub mod endpoints;

pub use auth::{AuthStrategy, SessionManager};
pub use client::builder::EiamClientBuilder;
pub use client::{AuditView, EiamClient};
pub use error::{ClientError, Result};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use models::{
    ApiEnvelope, AuditEventRecord, AuditEventType, AuditEventTypeGroup, AuditQuery, EventStatus,
    GeoLocation, LoginCredential, LoginOutcome, Page, PublicKeyInfo, SealedCredential,
    SessionToken, SortField, SortOrder, TimeRange, UserAgent, parse_query_time,
};
pub use serde_helpers::{EVENT_TIME_FORMAT, format_event_time, parse_event_time};
