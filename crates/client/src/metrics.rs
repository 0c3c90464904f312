//! Request metrics for console calls.
//!
//! Records through the `metrics` facade; without an installed recorder every
//! call is a no-op. Exposition lives in [`crate::metrics_exporter`].
//!
//! Labels: `endpoint`, `method`, `status`, `error_category`, plus `outcome`
//! on login outcomes and `kind` on audit corrections.

use std::time::Duration;

use crate::error::ClientError;

pub const METRIC_REQUEST_DURATION: &str = "eiam_api_request_duration_seconds";
pub const METRIC_REQUESTS_TOTAL: &str = "eiam_api_requests_total";
pub const METRIC_ERRORS_TOTAL: &str = "eiam_api_errors_total";
pub const METRIC_DESERIALIZATION_FAILURES: &str = "eiam_api_deserialization_failures_total";
/// Login attempts by outcome, `authenticated` or `rejected`.
pub const METRIC_LOGIN_OUTCOMES: &str = "eiam_login_outcomes_total";
/// Audit pages the client had to fix up after decoding.
pub const METRIC_AUDIT_CORRECTIONS: &str = "eiam_audit_result_corrections_total";

/// Coarse failure class used as the `error_category` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Refused connection, DNS failure, reset.
    Transport,
    Http4xx,
    Http5xx,
    /// Failure envelope carried on a non-error status.
    Api,
    Timeout,
    Tls,
    Unknown,
}

impl ErrorCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Http4xx => "http_4xx",
            Self::Http5xx => "http_5xx",
            Self::Api => "api",
            Self::Timeout => "timeout",
            Self::Tls => "tls",
            Self::Unknown => "unknown",
        }
    }

    fn from_status(status: u16) -> Self {
        match status {
            400..=499 => Self::Http4xx,
            500..=599 => Self::Http5xx,
            _ => Self::Api,
        }
    }
}

impl From<&ClientError> for ErrorCategory {
    fn from(error: &ClientError) -> Self {
        match error {
            ClientError::Timeout(_) => Self::Timeout,
            ClientError::ConnectionRefused(_) | ClientError::Transport(_) => Self::Transport,
            ClientError::Tls(_) => Self::Tls,
            ClientError::Unauthorized(_) => Self::Http4xx,
            ClientError::Api { status, .. } => Self::from_status(*status),
            _ => Self::Unknown,
        }
    }
}

/// What the client changed on a decoded audit page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditCorrection {
    /// Dropped records whose event type was not requested.
    FilteredEventType,
    /// Dropped records outside the requested time range.
    FilteredTimeRange,
    /// Cut the page down to `pageSize` records.
    Truncated,
    /// Re-sorted records by event time.
    Resorted,
}

impl AuditCorrection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FilteredEventType => "filtered_event_type",
            Self::FilteredTimeRange => "filtered_time_range",
            Self::Truncated => "truncated",
            Self::Resorted => "resorted",
        }
    }
}

/// Handle the client records through. A disabled collector drops everything.
///
/// ```rust,ignore
/// let collector = MetricsCollector::new();
/// collector.record_request(AUDIT_PATH, "GET");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// `status` is `None` when no response arrived; the label is then `error`.
    pub fn record_request_duration(
        &self,
        endpoint: &str,
        method: &str,
        duration: Duration,
        status: Option<u16>,
    ) {
        if !self.enabled {
            return;
        }
        let status = status.map_or_else(|| "error".to_string(), |s| s.to_string());
        metrics::histogram!(
            METRIC_REQUEST_DURATION,
            "endpoint" => endpoint.to_owned(),
            "method" => method.to_owned(),
            "status" => status,
        )
        .record(duration.as_secs_f64());
    }

    pub fn record_request(&self, endpoint: &str, method: &str) {
        if self.enabled {
            metrics::counter!(
                METRIC_REQUESTS_TOTAL,
                "endpoint" => endpoint.to_owned(),
                "method" => method.to_owned(),
            )
            .increment(1);
        }
    }

    pub fn record_client_error(&self, endpoint: &str, method: &str, error: &ClientError) {
        if self.enabled {
            metrics::counter!(
                METRIC_ERRORS_TOTAL,
                "endpoint" => endpoint.to_owned(),
                "method" => method.to_owned(),
                "error_category" => ErrorCategory::from(error).as_str(),
            )
            .increment(1);
        }
    }

    /// `model_type` names the type that failed to decode, e.g. `AuditEventRecord`.
    pub fn record_deserialization_failure(&self, endpoint: &str, model_type: &'static str) {
        if self.enabled {
            metrics::counter!(
                METRIC_DESERIALIZATION_FAILURES,
                "endpoint" => endpoint.to_owned(),
                "model_type" => model_type,
            )
            .increment(1);
        }
    }

    pub fn record_login_outcome(&self, authenticated: bool) {
        if self.enabled {
            let outcome = if authenticated { "authenticated" } else { "rejected" };
            metrics::counter!(METRIC_LOGIN_OUTCOMES, "outcome" => outcome).increment(1);
        }
    }

    pub fn record_audit_correction(&self, correction: AuditCorrection) {
        if self.enabled {
            metrics::counter!(METRIC_AUDIT_CORRECTIONS, "kind" => correction.as_str())
                .increment(1);
        }
    }
}
