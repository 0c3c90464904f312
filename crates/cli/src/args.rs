//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//! - Provide config path resolution helpers.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not handle config loading (see `main()`).

use clap::{Parser, Subcommand};
use eiam_config::env_var_or_none;
use std::path::{Path, PathBuf};

use crate::commands;

#[derive(Parser)]
#[command(name = "eiam-cli")]
#[command(about = "EIAM CLI - Log in to the EIAM console and query its audit log", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  eiam-cli -u alice login\n  eiam-cli audit list --event-type eiam:event:login:portal --page-size 20\n  eiam-cli audit list --start '2024-03-01 00:00:00' --end '2024-03-01 23:59:59' -o csv\n  eiam-cli audit types\n  eiam-cli --profile prod audit list --detailed\n"
)]
pub struct Cli {
    /// Base URL of the EIAM console (e.g., https://eiam.example.com)
    #[arg(short, long, global = true, env = "EIAM_BASE_URL")]
    pub base_url: Option<String>,

    /// Login identifier for the encrypted password login
    #[arg(short, long, global = true, env = "EIAM_USERNAME")]
    pub username: Option<String>,

    /// Password for the encrypted password login
    #[arg(short, long, global = true, env = "EIAM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Pre-issued API token (used instead of username/password)
    #[arg(short, long, global = true, env = "EIAM_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "EIAM_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long, global = true, env = "EIAM_SKIP_VERIFY")]
    pub skip_verify: bool,

    /// Display timezone offset for audit times (e.g., +08:00)
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub display_utc_offset: Option<String>,

    /// Profile name to load from config file
    #[arg(long, global = true, env = "EIAM_PROFILE")]
    pub profile: Option<String>,

    /// Output format (table, json, csv)
    #[arg(short, long, global = true, default_value = "table")]
    pub output: String,

    /// Output file path (saves results to file instead of stdout)
    #[arg(long, global = true, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Path to a custom configuration file (overrides default location).
    ///
    /// Can also be set via EIAM_CONFIG_PATH environment variable.
    #[arg(long, global = true, env = "EIAM_CONFIG_PATH", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Suppress all progress output (spinners).
    ///
    /// Note: Progress indicators always write to STDERR; this flag disables them entirely.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// OTLP collector endpoint for trace export (e.g., http://localhost:4317)
    #[arg(long, global = true, env = "EIAM_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Service name reported to the trace collector
    #[arg(long, global = true, env = "OTEL_SERVICE_NAME")]
    pub otel_service_name: Option<String>,

    /// Serve Prometheus metrics at this address (e.g., 127.0.0.1:9090)
    #[arg(long, global = true, env = "EIAM_METRICS_BIND")]
    pub metrics_bind: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration profiles
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommand,
    },

    /// Log in with the configured username and password
    Login,

    /// Show the public key used to encrypt the login password
    PublicKey,

    /// Query the audit log
    Audit {
        #[command(subcommand)]
        command: commands::audit::AuditCommand,
    },
}

/// Returns true if the path is empty or contains only whitespace.
pub(crate) fn path_is_blank(path: &Path) -> bool {
    path.to_string_lossy().trim().is_empty()
}

/// Normalizes the config path, ignoring empty or whitespace-only values.
///
/// Blank CLI values fall back to `EIAM_CONFIG_PATH`, which is normalized the same way.
pub fn resolve_config_path(path: Option<PathBuf>) -> Option<PathBuf> {
    let path = path.filter(|p| !path_is_blank(p));
    if path.is_none() {
        env_var_or_none("EIAM_CONFIG_PATH")
            .map(PathBuf::from)
            .filter(|p| !path_is_blank(p))
    } else {
        path
    }
}
