//! Audit table formatter.
//!
//! Responsibilities:
//! - Format one page of audit records as a tab-separated table.
//! - Render the expanded-row detail block when `detailed` is set.
//! - Format the event-type taxonomy grouped by category.
//!
//! Does NOT handle:
//! - Other resource types.

use anyhow::Result;
use eiam_client::{AuditEventRecord, AuditEventTypeGroup, AuditView, format_event_time};

use super::pagination::build_pagination_footer;
use crate::formatters::common::format_missing;

fn user_agent_cell(record: &AuditEventRecord) -> String {
    let agent = &record.user_agent;
    match (agent.platform.is_empty(), agent.browser.is_empty()) {
        (true, true) => format_missing(None).to_string(),
        (false, true) => agent.platform.clone(),
        (true, false) => agent.browser.clone(),
        (false, false) => format!("{} / {}", agent.platform, agent.browser),
    }
}

fn location_cell(record: &AuditEventRecord) -> String {
    match &record.geo_location {
        Some(geo) => match geo.region.as_deref() {
            Some(region) if !region.is_empty() => format!("{} ({})", geo.ip, region),
            _ => geo.ip.clone(),
        },
        None => format_missing(None).to_string(),
    }
}

pub fn format_audit_view(view: &AuditView, detailed: bool) -> Result<String> {
    let page = &view.page;
    if page.list.is_empty() {
        let mut output = if page.page > 1 {
            format!("No audit events found for page {}.", page.page)
        } else {
            "No audit events found.".to_string()
        };
        if page.total > 0
            && let Some(footer) = build_pagination_footer(page)
        {
            output.push('\n');
            output.push_str(&footer);
        }
        return Ok(output);
    }

    let mut lines = vec!["Time\tEvent Type\tUser\tLocation\tUser Agent\tStatus".to_string()];

    for record in &page.list {
        let event_type = view
            .event_type_name(&record.event_type)
            .unwrap_or(&record.event_type);
        lines.push(format!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            format_event_time(&record.event_time),
            event_type,
            format_missing(Some(&record.username)),
            location_cell(record),
            user_agent_cell(record),
            record.event_status,
        ));

        if detailed {
            lines.push(format!("  ID: {}", record.id));
            lines.push(format!("  Event Code: {}", record.event_type));
            lines.push(format!(
                "  User Type: {}",
                format_missing(record.user_type.as_deref())
            ));
            lines.push(format!(
                "  Actor: {}",
                format_missing(record.actor_id.as_deref())
            ));
            lines.push(format!(
                "  Result: {}",
                format_missing(record.event_result.as_deref())
            ));
            lines.push(format!(
                "  Content: {}",
                format_missing(record.event_content.as_deref())
            ));
        }
    }

    if let Some(footer) = build_pagination_footer(page) {
        lines.push(String::new());
        lines.push(footer);
    }

    Ok(lines.join("\n"))
}

pub fn format_event_types(groups: &[AuditEventTypeGroup]) -> Result<String> {
    if groups.is_empty() {
        return Ok("No audit event types available.".to_string());
    }

    let mut lines = vec!["Group\tCode\tName".to_string()];
    for group in groups {
        lines.push(format!("{}\t{}\t", group.name, group.code));
        for event_type in &group.types {
            lines.push(format!("\t{}\t{}", event_type.code, event_type.name));
        }
    }

    Ok(lines.join("\n"))
}
