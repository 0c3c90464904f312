//! Audit command implementation.
//!
//! Responsibilities:
//! - `audit list`: build an [`AuditQuery`] from flags and profile defaults, then
//!   load the taxonomy and the page together.
//! - `audit types`: print the grouped event-type taxonomy.
//!
//! Does NOT handle:
//! - Query validation beyond flag parsing (the client validates before sending).
//! - Output formatting details (see formatters module).
//!
//! Invariants:
//! - Times are `YYYY-MM-DD HH:mm:ss` in the display timezone; `--start` and
//!   `--end` must be given together.
//! - Every request races the cancellation token.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use eiam_client::{AuditQuery, AuditView, SortOrder, parse_query_time};
use eiam_config::AuditUserType;
use tracing::info;

use crate::cancellation::{CancellationToken, Cancelled};
use crate::formatters::{OutputFormat, get_formatter, output_result};
use crate::progress::Spinner;

#[derive(Subcommand)]
pub enum AuditCommand {
    /// List audit events
    List(AuditListArgs),
    /// List the audit event types, grouped by category
    Types,
}

#[derive(Args, Debug, Clone)]
pub struct AuditListArgs {
    /// Only show this event type code (repeatable)
    #[arg(long = "event-type", value_name = "CODE")]
    pub event_types: Vec<String>,

    /// Start of the time range (YYYY-MM-DD HH:mm:ss)
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// End of the time range (YYYY-MM-DD HH:mm:ss)
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Sort by event time: ascend or descend (default descend)
    #[arg(long)]
    pub sort_order: Option<String>,

    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Records per page (defaults to the profile's audit page size)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Actor population: user or app (defaults to the profile's user type)
    #[arg(long)]
    pub user_type: Option<String>,

    /// Show the expanded detail block for every record
    #[arg(short, long)]
    pub detailed: bool,
}

impl AuditListArgs {
    /// Turn the flags into a query, starting from the configured defaults.
    pub fn to_query(&self, defaults: &eiam_config::AuditDefaults) -> Result<AuditQuery> {
        let mut query = AuditQuery::from_defaults(defaults)
            .with_event_types(self.event_types.iter().map(String::as_str))
            .with_page(self.page);

        if let Some(size) = self.page_size {
            query = query.with_page_size(size);
        }
        if let Some(raw) = &self.sort_order {
            let order: SortOrder = raw.parse().map_err(anyhow::Error::msg)?;
            query = query.with_sort_order(order);
        }
        if let Some(raw) = &self.user_type {
            let user_type: AuditUserType = raw.parse().map_err(anyhow::Error::msg)?;
            query = query.with_user_type(user_type);
        }
        if let (Some(start), Some(end)) = (&self.start, &self.end) {
            query = query.with_time_range(parse_query_time(start)?, parse_query_time(end)?);
        }

        Ok(query)
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn run(
    config: eiam_config::Config,
    command: AuditCommand,
    metrics_enabled: bool,
    output_format: &str,
    output_file: Option<std::path::PathBuf>,
    quiet: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let mut client = crate::commands::build_client_from_config(&config, metrics_enabled)?;

    let output = match command {
        AuditCommand::List(args) => {
            let query = args.to_query(&config.audit)?;
            info!(
                event_types = query.event_types.len(),
                page = query.page,
                page_size = query.page_size,
                sort_order = %query.sort_order,
                user_type = %query.user_type,
                "Listing audit events"
            );

            let spinner = Spinner::new(!quiet, "Fetching audit events");
            let view: AuditView = tokio::select! {
                res = client.open_audit_view(&query) => res.context("Failed to fetch audit events")?,
                _ = cancel.cancelled() => return Err(Cancelled.into()),
            };
            spinner.finish();

            get_formatter(format).format_audit_view(&view, args.detailed)?
        }
        AuditCommand::Types => {
            info!("Listing audit event types");

            let spinner = Spinner::new(!quiet, "Fetching audit event types");
            let groups = tokio::select! {
                res = client.fetch_event_type_taxonomy() => res.context("Failed to fetch audit event types")?,
                _ = cancel.cancelled() => return Err(Cancelled.into()),
            };
            spinner.finish();

            get_formatter(format).format_event_types(&groups)?
        }
    };

    output_result(&output, format, output_file.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eiam_config::AuditDefaults;

    fn args() -> AuditListArgs {
        AuditListArgs {
            event_types: Vec::new(),
            start: None,
            end: None,
            sort_order: None,
            page: 1,
            page_size: None,
            user_type: None,
            detailed: false,
        }
    }

    #[test]
    fn test_defaults_come_from_config() {
        let defaults = AuditDefaults {
            page_size: 25,
            user_type: AuditUserType::App,
        };
        let query = args().to_query(&defaults).unwrap();
        assert_eq!(query.page_size, 25);
        assert_eq!(query.user_type, AuditUserType::App);
        assert_eq!(query.sort_order, SortOrder::Descend);
        assert!(query.event_types.is_empty());
        assert!(query.time_range.is_none());
    }

    #[test]
    fn test_flags_override_defaults() {
        let mut a = args();
        a.event_types = vec![
            "eiam:event:login:portal".to_string(),
            "eiam:event:login:portal".to_string(),
        ];
        a.sort_order = Some("asc".to_string());
        a.page = 3;
        a.page_size = Some(5);
        a.user_type = Some("user".to_string());
        a.start = Some("2024-03-01 00:00:00".to_string());
        a.end = Some("2024-03-01 23:59:59".to_string());

        let defaults = AuditDefaults {
            page_size: 25,
            user_type: AuditUserType::App,
        };
        let query = a.to_query(&defaults).unwrap();
        assert_eq!(query.event_types.len(), 1);
        assert_eq!(query.sort_order, SortOrder::Ascend);
        assert_eq!(query.page, 3);
        assert_eq!(query.page_size, 5);
        assert_eq!(query.user_type, AuditUserType::User);
        assert!(query.time_range.is_some());
    }

    #[test]
    fn test_bad_flag_values_are_errors() {
        let mut a = args();
        a.sort_order = Some("sideways".to_string());
        assert!(a.to_query(&AuditDefaults::default()).is_err());

        let mut a = args();
        a.user_type = Some("admin".to_string());
        assert!(a.to_query(&AuditDefaults::default()).is_err());

        let mut a = args();
        a.start = Some("yesterday".to_string());
        a.end = Some("2024-03-01 23:59:59".to_string());
        let err = a.to_query(&AuditDefaults::default()).unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD HH:mm:ss"));
    }
}
