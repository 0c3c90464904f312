//! Purpose: Audit listing and event-type taxonomy endpoints.
//! Responsibilities: Send filtered/sorted/paginated audit queries, decode records with partial
//! parse tolerance, and correct pages that do not honor the query.
//! Non-scope: Degrading taxonomy failures to an empty list (see `EiamClient::event_type_options`).
//! Invariants/Assumptions: Returned pages hold only records matching a non-empty event-type
//! filter, at most `pageSize` records, ordered by event time in the requested direction.

use chrono::FixedOffset;
use reqwest::Client;
use tracing::{debug, warn};

use crate::endpoints::{AUDIT_EVENT_TYPES_PATH, AUDIT_PATH, read_envelope, send_request};
use crate::error::Result;
use crate::metrics::{AuditCorrection, MetricsCollector};
use crate::models::{
    AuditEventRecord, AuditEventTypeGroup, AuditQuery, Page, SortOrder, WirePage,
};
use crate::serde_helpers::normalize_event_time_value;

/// Fetch the grouped event-type taxonomy, in server order.
pub async fn fetch_event_type_taxonomy(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<AuditEventTypeGroup>> {
    debug!("Fetching audit event types");

    let url = format!("{}{}", base_url, AUDIT_EVENT_TYPES_PATH);
    let builder = client.get(&url).bearer_auth(auth_token);
    let response = send_request(builder, AUDIT_EVENT_TYPES_PATH, "GET", metrics).await?;

    let groups = match read_envelope::<Vec<serde_json::Value>>(response)
        .await
        .and_then(|r| r.into_payload())
    {
        Ok(groups) => groups,
        Err(e) => {
            if let Some(m) = metrics {
                m.record_client_error(AUDIT_EVENT_TYPES_PATH, "GET", &e);
            }
            return Err(e);
        }
    };

    Ok(groups
        .into_iter()
        .filter_map(
            |v| match serde_json::from_value::<AuditEventTypeGroup>(v.clone()) {
                Ok(group) => Some(group),
                Err(e) => {
                    warn!(
                        "Failed to deserialize AuditEventTypeGroup from {}: error={}, value_preview={}",
                        AUDIT_EVENT_TYPES_PATH, e, v
                    );
                    if let Some(m) = metrics {
                        m.record_deserialization_failure(
                            AUDIT_EVENT_TYPES_PATH,
                            "AuditEventTypeGroup",
                        );
                    }
                    None
                }
            },
        )
        .collect())
}

/// Fetch one page of audit records.
///
/// `display_offset` is the console's display timezone; record timestamps that
/// carry an offset or are epoch milliseconds are converted into it.
///
/// # Errors
///
/// Returns [`crate::ClientError::InvalidQuery`] without sending anything when
/// the query fails validation.
pub async fn fetch_audit_page(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    query: &AuditQuery,
    display_offset: FixedOffset,
    metrics: Option<&MetricsCollector>,
) -> Result<Page<AuditEventRecord>> {
    query.validate()?;
    debug!(
        page = query.page,
        page_size = query.page_size,
        event_types = query.event_types.len(),
        sort_order = query.sort_order.as_str(),
        "Fetching audit page"
    );

    let url = format!("{}{}", base_url, AUDIT_PATH);
    let builder = client
        .get(&url)
        .bearer_auth(auth_token)
        .query(&query.to_query_params());
    let response = send_request(builder, AUDIT_PATH, "GET", metrics).await?;

    let wire = match read_envelope::<WirePage>(response)
        .await
        .and_then(|r| r.into_payload())
    {
        Ok(wire) => wire,
        Err(e) => {
            if let Some(m) = metrics {
                m.record_client_error(AUDIT_PATH, "GET", &e);
            }
            return Err(e);
        }
    };

    let mut parse_failures = 0usize;
    let records: Vec<AuditEventRecord> = wire
        .list
        .into_iter()
        .filter_map(|mut v| {
            if let Some(t) = v.get_mut("eventTime") {
                normalize_event_time_value(t, display_offset);
            }
            match serde_json::from_value::<AuditEventRecord>(v.clone()) {
                Ok(record) => Some(record),
                Err(e) => {
                    parse_failures += 1;
                    warn!(
                        "Failed to deserialize AuditEventRecord from {}: error={}, value_preview={}",
                        AUDIT_PATH, e, v
                    );
                    if let Some(m) = metrics {
                        m.record_deserialization_failure(AUDIT_PATH, "AuditEventRecord");
                    }
                    None
                }
            }
        })
        .collect();

    if parse_failures > 0 {
        debug!(
            "Decoded {} audit records with {} parse failures",
            records.len(),
            parse_failures
        );
    }

    Ok(Page {
        list: conform_to_query(records, query, metrics),
        total: wire.total,
        page: query.page,
        page_size: query.page_size,
    })
}

/// Make a decoded page honor the query it answered.
///
/// Drops records outside a non-empty event-type filter or the time range,
/// stably re-sorts by
/// event time when the server order is wrong, and truncates to `page_size`.
/// Each correction is logged and counted.
pub fn conform_to_query(
    mut records: Vec<AuditEventRecord>,
    query: &AuditQuery,
    metrics: Option<&MetricsCollector>,
) -> Vec<AuditEventRecord> {
    let before = records.len();
    records.retain(|r| query.matches_event_type(&r.event_type));
    if records.len() < before {
        warn!(
            dropped = before - records.len(),
            "Server returned audit records outside the event type filter"
        );
        if let Some(m) = metrics {
            m.record_audit_correction(AuditCorrection::FilteredEventType);
        }
    }

    let before = records.len();
    records.retain(|r| query.matches_event_time(&r.event_time));
    if records.len() < before {
        warn!(
            dropped = before - records.len(),
            "Server returned audit records outside the time range"
        );
        if let Some(m) = metrics {
            m.record_audit_correction(AuditCorrection::FilteredTimeRange);
        }
    }

    if !is_ordered(&records, query.sort_order) {
        warn!(
            sort_order = query.sort_order.as_str(),
            "Server returned audit records out of order; re-sorting by event time"
        );
        match query.sort_order {
            SortOrder::Ascend => records.sort_by(|a, b| a.event_time.cmp(&b.event_time)),
            SortOrder::Descend => records.sort_by(|a, b| b.event_time.cmp(&a.event_time)),
        }
        if let Some(m) = metrics {
            m.record_audit_correction(AuditCorrection::Resorted);
        }
    }

    let limit = query.page_size as usize;
    if records.len() > limit {
        warn!(
            returned = records.len(),
            page_size = limit,
            "Server returned more audit records than the page size"
        );
        records.truncate(limit);
        if let Some(m) = metrics {
            m.record_audit_correction(AuditCorrection::Truncated);
        }
    }

    records
}

fn is_ordered(records: &[AuditEventRecord], order: SortOrder) -> bool {
    records.windows(2).all(|pair| match order {
        SortOrder::Ascend => pair[0].event_time <= pair[1].event_time,
        SortOrder::Descend => pair[0].event_time >= pair[1].event_time,
    })
}
