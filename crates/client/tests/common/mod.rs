//! Common test utilities for integration tests.
//!
//! This module provides shared helper functions and re-exports commonly used
//! types for testing the EIAM client. All integration tests should use
//! these utilities to ensure consistency.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - All fixture files must be valid JSON
//!
//! # What this does NOT handle
//! - Mock server setup beyond the fixture console (use wiremock directly in tests)
//! - Test-specific assertions or test logic

use std::time::Duration;

// Re-export test utilities from eiam-client
#[allow(unused_imports)]
pub use eiam_client::testing::{FixtureServer, load_fixture};

// Re-export commonly used types for test convenience
// These are used via `use common::*;` in test files
#[allow(unused_imports)]
pub use reqwest::Client;
#[allow(unused_imports)]
pub use eiam_client::endpoints;
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

use eiam_client::{AuthStrategy, EiamClient};
use secrecy::SecretString;

/// Build a password-auth client against `base_url`.
#[allow(dead_code)]
pub fn password_client(base_url: &str, identifier: &str, secret: &str) -> EiamClient {
    EiamClient::builder()
        .base_url(base_url.to_string())
        .auth_strategy(AuthStrategy::Password {
            identifier: identifier.to_string(),
            secret: SecretString::new(secret.to_string().into()),
        })
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client should build")
}

/// Build an API-token client against `base_url`.
#[allow(dead_code)]
pub fn token_client(base_url: &str, token: &str) -> EiamClient {
    EiamClient::builder()
        .base_url(base_url.to_string())
        .auth_strategy(AuthStrategy::ApiToken {
            token: SecretString::new(token.to_string().into()),
        })
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client should build")
}

/// A base URL nothing listens on.
#[allow(dead_code)]
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
