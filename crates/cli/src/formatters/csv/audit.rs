//! Audit CSV formatter.

use anyhow::Result;
use eiam_client::{AuditEventRecord, AuditEventTypeGroup, AuditView, format_event_time};

use crate::formatters::common::{build_csv_header, build_csv_row};

const BASE_HEADERS: [&str; 9] = [
    "id",
    "event_time",
    "event_type",
    "event_type_name",
    "username",
    "ip",
    "region",
    "user_agent",
    "event_status",
];

const DETAIL_HEADERS: [&str; 4] = ["user_type", "actor_id", "event_result", "event_content"];

fn base_row(view: &AuditView, record: &AuditEventRecord) -> Vec<String> {
    let geo = record.geo_location.as_ref();
    let agent = &record.user_agent;
    let user_agent = [agent.platform.as_str(), agent.browser.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" / ");

    vec![
        record.id.clone(),
        format_event_time(&record.event_time),
        record.event_type.clone(),
        view.event_type_name(&record.event_type)
            .unwrap_or_default()
            .to_string(),
        record.username.clone(),
        geo.map(|g| g.ip.clone()).unwrap_or_default(),
        geo.and_then(|g| g.region.clone()).unwrap_or_default(),
        user_agent,
        record.event_status.to_string(),
    ]
}

/// Format one audit page as CSV. Empty pages produce the header row only.
pub fn format_audit_view(view: &AuditView, detailed: bool) -> Result<String> {
    let mut headers: Vec<&str> = BASE_HEADERS.to_vec();
    if detailed {
        headers.extend(DETAIL_HEADERS);
    }

    let mut csv = build_csv_header(&headers);
    for record in &view.page.list {
        let mut row = base_row(view, record);
        if detailed {
            row.extend([
                record.user_type.clone().unwrap_or_default(),
                record.actor_id.clone().unwrap_or_default(),
                record.event_result.clone().unwrap_or_default(),
                record.event_content.clone().unwrap_or_default(),
            ]);
        }
        csv.push_str(&build_csv_row(&row));
    }

    Ok(csv)
}

/// Format the taxonomy as one row per event type.
pub fn format_event_types(groups: &[AuditEventTypeGroup]) -> Result<String> {
    let mut csv = build_csv_header(&["group_code", "group_name", "code", "name"]);
    for group in groups {
        for event_type in &group.types {
            csv.push_str(&build_csv_row(&[
                group.code.clone(),
                group.name.clone(),
                event_type.code.clone(),
                event_type.name.clone(),
            ]));
        }
    }
    Ok(csv)
}
