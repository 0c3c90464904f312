//! Test support, compiled for this crate's tests and behind `test-utils`.
//!
//! [`FixtureServer`] is a wiremock console that knows one account
//! ([`FIXTURE_IDENTIFIER`] / [`FIXTURE_SECRET`]) and a fixed audit dataset.
//! Static response bodies live under `fixtures/` and load with [`load_fixture`].
//!
//! ```ignore
//! let server = FixtureServer::start().await;
//! let types = load_fixture("audit/event_types.json");
//! ```

pub mod fixture_server;
pub mod generators;

pub use fixture_server::{
    FIXTURE_IDENTIFIER, FIXTURE_KEY_ID, FIXTURE_SECRET, FIXTURE_SESSION_TOKEN, FixtureServer,
};

use std::path::Path;

/// Parse `fixtures/<fixture_path>`. Panics when the file is missing or not JSON.
pub fn load_fixture(fixture_path: &str) -> serde_json::Value {
    let full_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(fixture_path);
    let content = std::fs::read_to_string(&full_path)
        .unwrap_or_else(|e| panic!("Fixture {} unreadable: {e}", full_path.display()));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Fixture {} is not JSON: {e}", full_path.display()))
}
