//! Test data generators using the fake crate.
//!
//! Provides a configurable generator for realistic audit records, either as
//! typed [`AuditEventRecord`] values or as console JSON rows for the
//! fixture server.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use fake::Fake;
use fake::faker::internet::en::{IPv4, Username};
use fake::faker::lorem::en::Word;
use serde_json::Value;

use crate::models::{AuditEventRecord, EventStatus, GeoLocation, UserAgent};

const PLATFORMS: &[(&str, &str)] = &[
    ("macOS", "Chrome 122"),
    ("Windows", "Edge 121"),
    ("Linux", "Firefox 123"),
    ("iOS", "Safari 17"),
];

/// Generates audit records spread over a time window.
///
/// # Example
/// ```ignore
/// use eiam_client::testing::generators::AuditEventGenerator;
///
/// let records = AuditEventGenerator::new()
///     .with_count(200)
///     .with_event_types(["eiam:event:login:portal"])
///     .generate();
/// ```
#[derive(Debug, Clone)]
pub struct AuditEventGenerator {
    count: usize,
    event_types: Vec<String>,
    start: NaiveDateTime,
    span_minutes: i64,
    fail_percent: u8,
}

impl Default for AuditEventGenerator {
    fn default() -> Self {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Self {
            count: 50,
            event_types: vec![
                "eiam:event:login:portal".to_string(),
                "eiam:event:logout:portal".to_string(),
                "eiam:event:user:create".to_string(),
                "eiam:event:app:update".to_string(),
            ],
            start,
            span_minutes: 7 * 24 * 60,
            fail_percent: 10,
        }
    }
}

impl AuditEventGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Event type codes to draw from. An empty list keeps the defaults.
    pub fn with_event_types<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: Vec<String> = codes.into_iter().map(Into::into).collect();
        if !codes.is_empty() {
            self.event_types = codes;
        }
        self
    }

    /// Window the event times fall into, starting at `start`.
    pub fn with_time_window(mut self, start: NaiveDateTime, span_minutes: i64) -> Self {
        self.start = start;
        self.span_minutes = span_minutes.max(1);
        self
    }

    /// Share of records with `fail` status, 0 to 100.
    pub fn with_fail_percent(mut self, percent: u8) -> Self {
        self.fail_percent = percent.min(100);
        self
    }

    pub fn generate(&self) -> Vec<AuditEventRecord> {
        (0..self.count).map(|i| self.record(i)).collect()
    }

    /// Console JSON rows, as served by the audit endpoint.
    pub fn generate_json(&self) -> Vec<Value> {
        self.generate()
            .iter()
            .filter_map(|r| serde_json::to_value(r).ok())
            .collect()
    }

    fn record(&self, index: usize) -> AuditEventRecord {
        let event_type = self.event_types[(0..self.event_types.len()).fake::<usize>()].clone();
        let (platform, browser) = PLATFORMS[(0..PLATFORMS.len()).fake::<usize>()];
        let offset: i64 = (0..self.span_minutes).fake();
        let failed = (0..100u8).fake::<u8>() < self.fail_percent;

        AuditEventRecord {
            id: format!("{}", 1_700_000_000_000u64 + index as u64),
            event_type,
            username: Username().fake(),
            geo_location: Some(GeoLocation {
                ip: IPv4().fake(),
                region: Some(Word().fake()),
            }),
            user_agent: UserAgent {
                platform: platform.to_string(),
                browser: browser.to_string(),
            },
            event_time: self.start + TimeDelta::minutes(offset),
            event_status: if failed {
                EventStatus::Fail
            } else {
                EventStatus::Success
            },
            user_type: Some("user".to_string()),
            event_content: None,
            event_result: None,
            actor_id: None,
        }
    }
}
