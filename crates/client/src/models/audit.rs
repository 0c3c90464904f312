//! Audit event models and the audit query.
//!
//! Responsibilities:
//! - Deserialize audit records and the grouped event-type taxonomy.
//! - Build and validate [`AuditQuery`] values and render their query parameters.
//!
//! Does NOT handle:
//! - Sending requests (see [`crate::endpoints::fetch_audit_page`]).
//!
//! Invariants:
//! - An empty event-type set means "no filter" and sends no `eventType` param.
//! - The time range is inclusive and both bounds are sent together.
//! - `eventTime` values are display wall-clock time in `YYYY-MM-DD HH:mm:ss`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use eiam_config::constants::{DEFAULT_AUDIT_PAGE_SIZE, MAX_AUDIT_PAGE_SIZE};
use eiam_config::{AuditDefaults, AuditUserType};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::serde_helpers::{self, EVENT_TIME_FORMAT, format_event_time};

/// Outcome recorded on an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Success,
    Fail,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgent {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub browser: String,
}

/// One row of the audit table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEventRecord {
    #[serde(deserialize_with = "serde_helpers::string_from_string_or_number")]
    pub id: String,
    pub event_type: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub geo_location: Option<GeoLocation>,
    #[serde(default)]
    pub user_agent: UserAgent,
    #[serde(with = "serde_helpers::event_time")]
    pub event_time: NaiveDateTime,
    pub event_status: EventStatus,

    // Detail shown in the expanded row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventType {
    pub code: String,
    pub name: String,
}

/// A named group of event types used to populate the filter control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventTypeGroup {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub types: Vec<AuditEventType>,
}

/// Field the audit listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    EventTime,
}

impl SortField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EventTime => "eventTime",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascend,
    #[default]
    Descend,
}

impl SortOrder {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascend => "ascend",
            Self::Descend => "descend",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascend" | "asc" => Ok(Self::Ascend),
            "descend" | "desc" => Ok(Self::Descend),
            other => Err(format!(
                "invalid sort order '{other}' (expected ascend or descend)"
            )),
        }
    }
}

/// Inclusive start/end pair in the display timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    pub fn contains(&self, t: &NaiveDateTime) -> bool {
        *t >= self.start && *t <= self.end
    }
}

/// Parse a `YYYY-MM-DD HH:mm:ss` (or `T`-separated) time-range bound.
pub fn parse_query_time(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, EVENT_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| {
            ClientError::InvalidQuery(format!(
                "invalid time '{raw}' (expected YYYY-MM-DD HH:mm:ss)"
            ))
        })
}

/// Filter, sort, and pagination for one audit listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditQuery {
    /// Selected event type codes. Empty means unfiltered.
    pub event_types: BTreeSet<String>,
    pub time_range: Option<TimeRange>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    pub user_type: AuditUserType,
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            event_types: BTreeSet::new(),
            time_range: None,
            sort_field: SortField::EventTime,
            sort_order: SortOrder::Descend,
            page: 1,
            page_size: DEFAULT_AUDIT_PAGE_SIZE,
            user_type: AuditUserType::User,
        }
    }
}

impl AuditQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the configured page size and user type.
    pub fn from_defaults(defaults: &AuditDefaults) -> Self {
        Self {
            page_size: defaults.page_size,
            user_type: defaults.user_type,
            ..Self::default()
        }
    }

    pub fn with_event_type(mut self, code: impl Into<String>) -> Self {
        self.event_types.insert(code.into());
        self
    }

    pub fn with_event_types<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_types.extend(codes.into_iter().map(Into::into));
        self
    }

    pub fn with_time_range(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.time_range = Some(TimeRange { start, end });
        self
    }

    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_user_type(mut self, user_type: AuditUserType) -> Self {
        self.user_type = user_type;
        self
    }

    /// Check paging bounds and the time range ordering.
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(ClientError::InvalidQuery(
                "page numbers start at 1".to_string(),
            ));
        }

        if self.page_size == 0 || self.page_size > MAX_AUDIT_PAGE_SIZE {
            return Err(ClientError::InvalidQuery(format!(
                "page size must be between 1 and {MAX_AUDIT_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }

        if let Some(range) = &self.time_range
            && range.start > range.end
        {
            return Err(ClientError::InvalidQuery(format!(
                "time range start {} is after end {}",
                format_event_time(&range.start),
                format_event_time(&range.end)
            )));
        }

        Ok(())
    }

    /// True when a record with `event_type` passes the type filter.
    pub fn matches_event_type(&self, event_type: &str) -> bool {
        self.event_types.is_empty() || self.event_types.contains(event_type)
    }

    /// True without a time range, or when `t` falls inside it (inclusive).
    pub fn matches_event_time(&self, t: &NaiveDateTime) -> bool {
        self.time_range.is_none_or(|range| range.contains(t))
    }

    /// Query parameters for `GET /api/v1/audit`.
    pub(crate) fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = self
            .event_types
            .iter()
            .map(|code| ("eventType", code.clone()))
            .collect();

        if let Some(range) = &self.time_range {
            params.push(("eventTimeStart", format_event_time(&range.start)));
            params.push(("eventTimeEnd", format_event_time(&range.end)));
        }

        params.push(("sortField", self.sort_field.as_str().to_string()));
        params.push(("sortOrder", self.sort_order.as_str().to_string()));
        params.push(("page", self.page.to_string()));
        params.push(("pageSize", self.page_size.to_string()));
        params.push(("userType", self.user_type.as_str().to_string()));
        params
    }
}
