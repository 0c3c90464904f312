//! Configuration management commands.
//!
//! Responsibilities:
//! - List stored profiles with secrets redacted.
//! - Create or update a profile, optionally moving secrets into the system keyring.
//! - Delete a profile together with its keyring entries.
//!
//! Invariants:
//! - With `--use-keyring`, secrets go to the keyring BEFORE the profile is saved,
//!   so plaintext never reaches disk.
//! - Values are validated before anything is written.

use anyhow::{Context, Result};
use clap::Subcommand;
use eiam_config::constants::MAX_AUDIT_PAGE_SIZE;
use eiam_config::{AuditUserType, ProfileConfig, ProfileStore, SecureValue, parse_utc_offset};
use secrecy::SecretString;
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::formatters::{OutputFormat, get_formatter, output_result};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// List all configured profiles (secrets are redacted)
    List,

    /// Set or update a profile
    Set(SetArgs),

    /// Delete a profile and its keyring entries
    Delete {
        /// Profile name to delete
        profile_name: String,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct SetArgs {
    /// Profile name
    pub profile_name: String,

    /// Base URL of the EIAM console
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Login identifier
    #[arg(short, long)]
    pub username: Option<String>,

    /// Login password
    #[arg(short, long)]
    pub password: Option<String>,

    /// Pre-issued API token
    #[arg(short, long)]
    pub api_token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub skip_verify: Option<bool>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Default audit page size
    #[arg(long)]
    pub audit_page_size: Option<u32>,

    /// Default audit user type (user or app)
    #[arg(long)]
    pub user_type: Option<String>,

    /// Display timezone offset for audit times (e.g., +08:00)
    #[arg(long, allow_hyphen_values = true)]
    pub display_utc_offset: Option<String>,

    /// Store password/token in system keyring
    #[arg(long)]
    pub use_keyring: bool,
}

pub fn run(
    command: ConfigCommand,
    output_format: &str,
    output_file: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut store = match config_path {
        Some(path) => ProfileStore::open(path)?,
        None => ProfileStore::open_default()?,
    };

    match command {
        ConfigCommand::List => run_list(&store, output_format, output_file),
        ConfigCommand::Set(args) => run_set(&mut store, args),
        ConfigCommand::Delete { profile_name } => run_delete(&mut store, &profile_name),
    }
}

fn run_list(store: &ProfileStore, output_format: &str, output_file: Option<PathBuf>) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let output = get_formatter(format).format_profiles(store.list_profiles())?;
    output_result(&output, format, output_file.as_ref())
}

/// Prompts for the password when running interactively.
fn prompt_for_password() -> Option<SecureValue> {
    if !std::io::stdin().is_terminal() {
        return None;
    }
    dialoguer::Password::new()
        .with_prompt("Password")
        .allow_empty_password(false)
        .interact()
        .ok()
        .map(|input| SecureValue::Plain(SecretString::new(input.into())))
}

fn validate_set_args(args: &SetArgs) -> Result<()> {
    if let Some(timeout) = args.timeout_seconds
        && timeout == 0
    {
        anyhow::bail!("--timeout-seconds must be greater than 0");
    }
    if let Some(size) = args.audit_page_size
        && (size == 0 || size > MAX_AUDIT_PAGE_SIZE)
    {
        anyhow::bail!("--audit-page-size must be between 1 and {MAX_AUDIT_PAGE_SIZE}");
    }
    if let Some(offset) = &args.display_utc_offset {
        parse_utc_offset(offset)?;
    }
    Ok(())
}

fn run_set(store: &mut ProfileStore, args: SetArgs) -> Result<()> {
    validate_set_args(&args)?;
    let user_type = args
        .user_type
        .as_deref()
        .map(str::parse::<AuditUserType>)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let profile_name = args.profile_name.as_str();
    let existing = store.profile(profile_name).cloned().unwrap_or_default();

    let base_url = args.base_url.or(existing.base_url);
    if base_url.is_none() {
        anyhow::bail!("Base URL is required. Use --base-url to specify the EIAM console URL");
    }
    let username = args.username.or(existing.username);

    // Empty CLI values count as not given
    let password = args.password.filter(|s| !s.is_empty());
    let api_token = args.api_token.filter(|s| !s.is_empty());

    let mut password = password
        .map(|pw| SecureValue::Plain(SecretString::new(pw.into())))
        .or(existing.password);
    let mut api_token = api_token
        .map(|token| SecureValue::Plain(SecretString::new(token.into())))
        .or(existing.api_token);

    if username.is_some() && password.is_none() && api_token.is_none() {
        password = prompt_for_password();
        if password.is_none() {
            anyhow::bail!(
                "Either --password or --api-token must be provided when using username. Use one for authentication"
            );
        }
    }

    if args.use_keyring {
        if let (Some(username), Some(SecureValue::Plain(pw))) = (&username, &password) {
            password = Some(
                store
                    .store_password_in_keyring(profile_name, username, pw)
                    .context("Failed to store password in keyring")?,
            );
        }
        if let Some(SecureValue::Plain(token)) = &api_token {
            api_token = Some(
                store
                    .store_token_in_keyring(profile_name, token)
                    .context("Failed to store API token in keyring")?,
            );
        }
    }

    let profile = ProfileConfig {
        base_url,
        username,
        password,
        api_token,
        skip_verify: args.skip_verify.or(existing.skip_verify),
        timeout_seconds: args.timeout_seconds.or(existing.timeout_seconds),
        session_expiry_buffer_seconds: existing.session_expiry_buffer_seconds,
        session_ttl_seconds: existing.session_ttl_seconds,
        audit_page_size: args.audit_page_size.or(existing.audit_page_size),
        audit_user_type: user_type.or(existing.audit_user_type),
        display_utc_offset: args.display_utc_offset.or(existing.display_utc_offset),
    };

    store.save_profile(profile_name, profile)?;
    println!("Profile '{}' saved successfully.", profile_name);

    Ok(())
}

fn run_delete(store: &mut ProfileStore, profile_name: &str) -> Result<()> {
    store.delete_profile(profile_name)?;
    println!("Profile '{}' deleted successfully.", profile_name);
    Ok(())
}
