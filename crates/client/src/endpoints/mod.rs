//! REST API endpoint implementations.
//!
//! Each endpoint is a free async function over a borrowed `reqwest::Client`
//! so it can be driven directly by tests or wrapped by [`crate::EiamClient`].

mod audit;
mod auth;
mod request;

pub use audit::{conform_to_query, fetch_audit_page, fetch_event_type_taxonomy};
pub use auth::{fetch_login_public_secret, submit_login};
pub use request::send_request;

pub(crate) use request::read_envelope;

/// `GET` login public key (`?type=login`).
pub const PUBLIC_SECRET_PATH: &str = "/api/v1/public_secret";
/// `POST` form-encoded login.
pub const LOGIN_PATH: &str = "/api/v1/login";
/// `GET` grouped audit event types.
pub const AUDIT_EVENT_TYPES_PATH: &str = "/api/v1/audit/event_types";
/// `GET` filtered, sorted, paginated audit listing.
pub const AUDIT_PATH: &str = "/api/v1/audit";
