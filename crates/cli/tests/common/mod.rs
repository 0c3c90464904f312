//! Shared test utilities for eiam-cli integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Point commands at a fixture console with the fixture account.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper are hermetic by default.
//! - No `EIAM_*` variable from the host leaks into the child process.

use assert_cmd::Command;
use eiam_client::testing::{FIXTURE_IDENTIFIER, FIXTURE_SECRET};

/// Returns a hermetic `eiam-cli` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - Connection and profile env vars are cleared.
pub fn eiam_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("eiam-cli");

    cmd.env("DOTENV_DISABLED", "1");

    for key in [
        "EIAM_BASE_URL",
        "EIAM_USERNAME",
        "EIAM_PASSWORD",
        "EIAM_API_TOKEN",
        "EIAM_PROFILE",
        "EIAM_CONFIG_PATH",
        "EIAM_TIMEOUT",
        "EIAM_SKIP_VERIFY",
        "EIAM_AUDIT_PAGE_SIZE",
        "EIAM_USER_TYPE",
        "EIAM_DISPLAY_UTC_OFFSET",
        "EIAM_OTLP_ENDPOINT",
        "EIAM_METRICS_BIND",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }

    cmd
}

/// Returns a hermetic command logged in as the fixture account against `base_url`.
#[allow(dead_code)]
pub fn eiam_cmd_as_fixture_user(base_url: &str) -> Command {
    let mut cmd = eiam_cmd();
    cmd.env("EIAM_BASE_URL", base_url)
        .env("EIAM_USERNAME", FIXTURE_IDENTIFIER)
        .env("EIAM_PASSWORD", FIXTURE_SECRET)
        .arg("--quiet");
    cmd
}
