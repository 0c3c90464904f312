//! `eiam-cli`: encrypted login and audit queries against an EIAM console.
//!
//! Results go to stdout as a table, JSON, or CSV; logs, spinners and errors
//! go to stderr. Sessions live only as long as one invocation.
//!
//! `.env` is loaded before argument parsing so it can feed clap's `env`
//! defaults.

mod args;
mod cancellation;
mod commands;
mod config_context;
mod dispatch;
mod error;
mod formatters;
mod progress;

use std::fmt::Display;
use std::time::Duration;

use args::{Cli, path_is_blank};
use cancellation::{CancellationToken, is_cancelled_error, print_cancelled_message};
use clap::Parser;
use config_context::ConfigCommandContext;
use dispatch::run_command;
use eiam_client::metrics_exporter::MetricsExporter;
use eiam_client::tracing::{TracingConfig, TracingGuard};
use eiam_config::{Config, ConfigLoader, parse_utc_offset};
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Unwrap a startup step or exit with a general error.
fn or_exit<T, E: Display>(result: Result<T, E>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("{what}: {e:#}");
        std::process::exit(ExitCode::GeneralError.as_i32());
    })
}

/// Environment over profile, then the global flags on top.
fn load_config(cli: &Cli) -> Config {
    let mut loader = ConfigLoader::new();
    // A blank --config-path falls back to EIAM_CONFIG_PATH
    if let Some(path) = cli.config_path.as_ref().filter(|p| !path_is_blank(p)) {
        loader = loader.with_config_path(path.clone());
    }
    if let Some(name) = &cli.profile {
        loader = loader.with_profile_name(name.clone());
    }

    loader = or_exit(loader.from_env(), "Invalid EIAM_* environment");
    if loader.profile_name().is_some() {
        loader = or_exit(loader.from_profile(), "Could not load profile");
    }

    let loader = or_exit(apply_flags(loader, cli), "Invalid option");
    or_exit(loader.build(), "Configuration error")
}

fn apply_flags(mut loader: ConfigLoader, cli: &Cli) -> Result<ConfigLoader, String> {
    if let Some(url) = &cli.base_url {
        loader = loader.with_base_url(url.clone());
    }
    if let Some(username) = &cli.username {
        loader = loader.with_username(username.clone());
    }
    if let Some(password) = &cli.password {
        loader = loader.with_password(password.clone());
    }
    if let Some(token) = &cli.api_token {
        loader = loader.with_api_token(token.clone());
    }
    if let Some(secs) = cli.timeout {
        loader = loader.with_timeout(Duration::from_secs(secs));
    }
    if cli.skip_verify {
        loader = loader.with_skip_verify(true);
    }
    if let Some(offset) = &cli.display_utc_offset {
        let seconds =
            parse_utc_offset(offset).map_err(|e| format!("--display-utc-offset: {e}"))?;
        loader = loader.with_display_utc_offset_seconds(seconds);
    }
    Ok(loader)
}

/// OTLP export when an endpoint is given, otherwise plain fmt logs on stderr
/// filtered by `RUST_LOG`.
fn init_tracing(cli: &Cli) -> Option<TracingGuard> {
    let Some(endpoint) = &cli.otlp_endpoint else {
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return None;
    };

    let config = TracingConfig::new()
        .with_otlp_endpoint(endpoint)
        .with_service_name(cli.otel_service_name.as_deref().unwrap_or("eiam-cli"))
        .with_service_version(env!("CARGO_PKG_VERSION"))
        .with_stdout(true);
    Some(or_exit(config.init(), "Failed to initialize OpenTelemetry tracing"))
}

#[tokio::main]
async fn main() {
    or_exit(ConfigLoader::new().load_dotenv(), "Failed to load .env");

    let cli = Cli::parse();
    let tracing_guard = init_tracing(&cli);

    let _metrics_exporter = cli.metrics_bind.as_deref().map(|addr| {
        let exporter = or_exit(MetricsExporter::install(addr), "Failed to start metrics exporter");
        tracing::info!(addr = %exporter.bind_addr(), "Serving metrics at /metrics");
        exporter
    });

    let config_context = match cli.command {
        // Profile management works without any connection settings
        args::Commands::Config { .. } => ConfigCommandContext::Placeholder,
        _ => ConfigCommandContext::Real(Box::new(load_config(&cli))),
    };

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => on_ctrl_c.cancel(),
            Err(e) => tracing::warn!(error = %e, "Ctrl+C handler unavailable"),
        }
    });

    let exit_code = match run_command(cli, config_context, &cancel).await {
        Ok(()) => ExitCode::Success,
        Err(e) if is_cancelled_error(&e) => {
            print_cancelled_message();
            ExitCode::Interrupted
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            e.exit_code()
        }
    };

    if let Some(guard) = tracing_guard {
        guard.shutdown();
    }
    std::process::exit(exit_code.as_i32());
}
