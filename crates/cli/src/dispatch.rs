//! Routes a parsed [`Cli`] to its command handler.
//!
//! Responsibilities:
//! - Hand each console command its resolved `Config`, output options and the
//!   Ctrl+C token.
//! - Run `config` subcommands against the profile file alone.
//!
//! Does NOT handle:
//! - Resolving configuration (`main::load_config`).
//!
//! Invariants:
//! - Request metrics are collected only when `--metrics-bind` started an exporter.

use anyhow::Result;

use crate::args::{Cli, Commands, resolve_config_path};
use crate::cancellation::CancellationToken;
use crate::commands;
use crate::config_context::ConfigCommandContext;

pub(crate) async fn run_command(
    cli: Cli,
    context: ConfigCommandContext,
    cancel: &CancellationToken,
) -> Result<()> {
    let Cli {
        command,
        output,
        output_file,
        quiet,
        config_path,
        metrics_bind,
        ..
    } = cli;
    let metrics = metrics_bind.is_some();

    match command {
        Commands::Config { command } => {
            commands::config::run(command, &output, output_file, resolve_config_path(config_path))
        }
        Commands::Login => {
            let config = context.into_real_config()?;
            commands::login::run(config, metrics, &output, output_file, quiet, cancel).await
        }
        Commands::PublicKey => {
            let config = context.into_real_config()?;
            commands::public_key::run(config, metrics, &output, output_file, quiet, cancel).await
        }
        Commands::Audit { command } => {
            let config = context.into_real_config()?;
            commands::audit::run(config, command, metrics, &output, output_file, quiet, cancel)
                .await
        }
    }
}
