//! Login public key command.
//!
//! Fetches the RSA key the console uses to decrypt login passwords. Useful for
//! checking connectivity before a login and for comparing key ids.

use anyhow::{Context, Result};
use tracing::info;

use crate::cancellation::{CancellationToken, Cancelled};
use crate::formatters::{OutputFormat, get_formatter, output_result};
use crate::progress::Spinner;

pub async fn run(
    config: eiam_config::Config,
    metrics_enabled: bool,
    output_format: &str,
    output_file: Option<std::path::PathBuf>,
    quiet: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let client = crate::commands::build_client_from_config(&config, metrics_enabled)?;
    info!(base_url = %client.base_url(), "Fetching login public key");

    let spinner = Spinner::new(!quiet, "Fetching login public key");
    let key = tokio::select! {
        res = client.fetch_login_public_secret() => res.context("Failed to fetch login public key")?,
        _ = cancel.cancelled() => return Err(Cancelled.into()),
    };
    spinner.finish();

    let output = get_formatter(format).format_public_key(&key)?;
    output_result(&output, format, output_file.as_ref())
}
