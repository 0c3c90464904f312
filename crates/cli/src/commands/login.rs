//! Login command implementation.
//!
//! Responsibilities:
//! - Run the full login flow: fetch the public key, seal the password, submit.
//! - Print the outcome; a rejected login becomes a [`LoginRejected`] error.
//!
//! Does NOT handle:
//! - Persisting the session. The token lives only as long as the process.
//!
//! Invariants:
//! - The session token and the password are never printed or logged.

use anyhow::{Context, Result};
use eiam_client::{LoginCredential, LoginOutcome};
use eiam_config::AuthStrategy;
use tracing::{info, warn};

use crate::cancellation::{CancellationToken, Cancelled};
use crate::error::LoginRejected;
use crate::formatters::{LoginOutput, OutputFormat, get_formatter, output_result};
use crate::progress::Spinner;

/// Identifier and password from the resolved configuration.
fn login_credential(config: &eiam_config::Config) -> Result<LoginCredential> {
    match &config.auth.strategy {
        AuthStrategy::Password { username, password } => {
            Ok(LoginCredential::new(username.clone(), password.clone()))
        }
        AuthStrategy::ApiToken { .. } => anyhow::bail!(
            "Login needs a username and password; an API token is configured. \
             Use --username/--password or EIAM_USERNAME/EIAM_PASSWORD."
        ),
    }
}

pub async fn run(
    config: eiam_config::Config,
    metrics_enabled: bool,
    output_format: &str,
    output_file: Option<std::path::PathBuf>,
    quiet: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let credential = login_credential(&config)?;
    let identifier = credential.identifier.clone();
    let mut client = crate::commands::build_client_from_config(&config, metrics_enabled)?;

    info!(identifier = %identifier, base_url = %client.base_url(), "Logging in");

    let spinner = Spinner::new(!quiet, format!("Logging in as {identifier}"));
    let outcome = tokio::select! {
        res = client.login(credential) => res.context("Login request failed")?,
        _ = cancel.cancelled() => return Err(Cancelled.into()),
    };

    match outcome {
        LoginOutcome::Authenticated(_) => {
            spinner.finish();
            let login = LoginOutput::authenticated(client.base_url(), identifier);
            let output = get_formatter(format).format_login(&login)?;
            output_result(&output, format, output_file.as_ref())
        }
        LoginOutcome::Rejected {
            error_code,
            error_message,
        } => {
            warn!(identifier = %identifier, error_code = ?error_code, "Login rejected");
            Err(LoginRejected {
                error_code,
                message: error_message,
            }
            .into())
        }
    }
}
