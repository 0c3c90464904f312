//! CLI command implementations.

pub mod audit;
pub mod config;
pub mod login;
pub mod public_key;

use anyhow::{Context, Result};
use eiam_client::{EiamClient, MetricsCollector};

/// Build a client for `config`, recording metrics when an exporter is running.
pub fn build_client_from_config(
    config: &eiam_config::Config,
    metrics_enabled: bool,
) -> Result<EiamClient> {
    let mut builder = EiamClient::builder().from_config(config);
    if metrics_enabled {
        builder = builder.metrics(MetricsCollector::new());
    }
    builder.build().context("Failed to build EIAM client")
}
