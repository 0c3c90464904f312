//! Prometheus scrape endpoint for the client's metrics.
//!
//! Installs the global `metrics` recorder and serves `/metrics` over HTTP
//! on the ambient tokio runtime. Request latency uses explicit histogram
//! buckets sized for console round trips.

use std::net::{AddrParseError, SocketAddr};

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};
use tracing::info;

use crate::metrics::METRIC_REQUEST_DURATION;

/// Latency buckets in seconds.
const REQUEST_DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

/// Handle for an installed exporter.
pub struct MetricsExporter {
    bind_addr: SocketAddr,
}

impl MetricsExporter {
    /// Install the exporter listening on `bind_addr` (a literal socket address
    /// such as `127.0.0.1:9464`; host names are not resolved).
    ///
    /// # Errors
    /// Fails on an unparseable address, when a recorder is already installed,
    /// or when the listener cannot be started.
    pub fn install(bind_addr: &str) -> Result<Self, MetricsExporterError> {
        let addr: SocketAddr =
            bind_addr
                .parse()
                .map_err(|source| MetricsExporterError::InvalidBindAddress {
                    addr: bind_addr.to_string(),
                    source,
                })?;

        PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(METRIC_REQUEST_DURATION.to_string()),
                REQUEST_DURATION_BUCKETS,
            )?
            .with_http_listener(addr)
            .install()?;

        info!(%addr, "Serving Prometheus metrics at /metrics");
        Ok(Self { bind_addr: addr })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsExporterError {
    #[error("Invalid bind address '{addr}': {source}")]
    InvalidBindAddress {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("Failed to build Prometheus recorder: {0}")]
    BuildError(#[from] BuildError),
}
