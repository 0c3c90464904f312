//! Formatter tests across the table, JSON, and CSV outputs.

use super::common::escape_csv;
use super::*;
use chrono::NaiveDate;
use eiam_client::{
    AuditEventRecord, AuditEventType, AuditEventTypeGroup, AuditView, EventStatus, GeoLocation,
    Page, PublicKeyInfo, UserAgent,
};
use eiam_config::{ProfileConfig, SecureValue};
use secrecy::SecretString;
use std::collections::BTreeMap;

fn record(id: &str, event_type: &str, hour: u32) -> AuditEventRecord {
    AuditEventRecord {
        id: id.to_string(),
        event_type: event_type.to_string(),
        username: "alice".to_string(),
        geo_location: Some(GeoLocation {
            ip: "10.0.0.10".to_string(),
            region: Some("Shandong".to_string()),
        }),
        user_agent: UserAgent {
            platform: "macOS".to_string(),
            browser: "Chrome 122".to_string(),
        },
        event_time: NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap(),
        event_status: EventStatus::Success,
        user_type: Some("user".to_string()),
        event_content: Some("{\"target\": \"alice\"}".to_string()),
        event_result: Some("ok".to_string()),
        actor_id: Some("actor-1".to_string()),
    }
}

fn taxonomy() -> Vec<AuditEventTypeGroup> {
    vec![AuditEventTypeGroup {
        code: "eiam:event:login".to_string(),
        name: "Login".to_string(),
        types: vec![AuditEventType {
            code: "eiam:event:login:portal".to_string(),
            name: "Portal login".to_string(),
        }],
    }]
}

fn view(list: Vec<AuditEventRecord>, total: u64, event_types: Vec<AuditEventTypeGroup>) -> AuditView {
    AuditView {
        event_types,
        page: Page {
            list,
            total,
            page: 1,
            page_size: 10,
        },
    }
}

fn profiles() -> BTreeMap<String, ProfileConfig> {
    let mut map = BTreeMap::new();
    map.insert(
        "prod".to_string(),
        ProfileConfig {
            base_url: Some("https://eiam.example.com".to_string()),
            username: Some("alice".to_string()),
            password: Some(SecureValue::Plain(SecretString::new(
                "plain-secret-value".to_string().into(),
            ))),
            api_token: Some(SecureValue::Keyring {
                keyring_account: "prod-token".to_string(),
            }),
            audit_page_size: Some(25),
            ..Default::default()
        },
    );
    map
}

#[test]
fn test_output_format_parse() {
    assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
    assert_eq!(OutputFormat::from_str("TABLE").unwrap(), OutputFormat::Table);
    assert_eq!(OutputFormat::from_str("csv").unwrap(), OutputFormat::Csv);
    let err = OutputFormat::from_str("xml").unwrap_err();
    assert!(err.to_string().contains("Valid options: json, table, csv"));
}

#[test]
fn test_table_audit_uses_taxonomy_names() {
    let v = view(vec![record("1", "eiam:event:login:portal", 8)], 1, taxonomy());
    let output = TableFormatter.format_audit_view(&v, false).unwrap();

    assert!(output.starts_with("Time\tEvent Type\tUser"));
    assert!(output.contains("2024-03-01 08:00:00\tPortal login\talice"));
    assert!(output.contains("10.0.0.10 (Shandong)"));
    assert!(output.contains("macOS / Chrome 122"));
    assert!(output.contains("Showing 1-1 of 1 (page 1 of 1)"));
    assert!(!output.contains("Actor:"));
}

#[test]
fn test_table_audit_falls_back_to_code() {
    let v = view(vec![record("1", "eiam:event:app:update", 8)], 1, Vec::new());
    let output = TableFormatter.format_audit_view(&v, false).unwrap();
    assert!(output.contains("\teiam:event:app:update\t"));
}

#[test]
fn test_table_audit_detailed_block() {
    let v = view(vec![record("42", "eiam:event:login:portal", 8)], 1, taxonomy());
    let output = TableFormatter.format_audit_view(&v, true).unwrap();

    assert!(output.contains("  ID: 42"));
    assert!(output.contains("  Event Code: eiam:event:login:portal"));
    assert!(output.contains("  User Type: user"));
    assert!(output.contains("  Actor: actor-1"));
    assert!(output.contains("  Result: ok"));
}

#[test]
fn test_table_audit_missing_values() {
    let mut r = record("1", "eiam:event:login:portal", 8);
    r.geo_location = None;
    r.user_agent = UserAgent::default();
    r.actor_id = None;
    let output = TableFormatter
        .format_audit_view(&view(vec![r], 1, Vec::new()), true)
        .unwrap();
    assert!(output.contains("alice\tN/A\tN/A\tsuccess"));
    assert!(output.contains("  Actor: N/A"));
}

#[test]
fn test_empty_states() {
    let empty = view(Vec::new(), 0, Vec::new());
    assert_eq!(
        TableFormatter.format_audit_view(&empty, false).unwrap(),
        "No audit events found."
    );

    let json = JsonFormatter.format_audit_view(&empty, false).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["list"], serde_json::json!([]));
    assert_eq!(parsed["total"], 0);

    let csv = CsvFormatter.format_audit_view(&empty, false).unwrap();
    assert_eq!(csv.lines().count(), 1);
    assert!(csv.starts_with("id,event_time,event_type"));
}

#[test]
fn test_json_audit_page_shape() {
    let v = view(vec![record("7", "eiam:event:login:portal", 9)], 3, taxonomy());
    let json = JsonFormatter.format_audit_view(&v, false).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["total"], 3);
    assert_eq!(parsed["page"], 1);
    assert_eq!(parsed["pageSize"], 10);
    assert_eq!(parsed["list"][0]["id"], "7");
    assert_eq!(parsed["list"][0]["eventTime"], "2024-03-01 09:00:00");
    assert_eq!(parsed["list"][0]["eventStatus"], "success");
}

#[test]
fn test_csv_audit_escapes_content() {
    let v = view(vec![record("1", "eiam:event:login:portal", 8)], 1, taxonomy());
    let csv = CsvFormatter.format_audit_view(&v, true).unwrap();
    let mut lines = csv.lines();

    let header = lines.next().unwrap();
    assert!(header.ends_with("user_type,actor_id,event_result,event_content"));

    let row = lines.next().unwrap();
    assert!(row.starts_with("1,2024-03-01 08:00:00,eiam:event:login:portal,Portal login,alice"));
    assert!(row.ends_with("\"{\"\"target\"\": \"\"alice\"\"}\""));
}

#[test]
fn test_event_types_all_formats() {
    let groups = taxonomy();

    let table = TableFormatter.format_event_types(&groups).unwrap();
    assert!(table.contains("Login\teiam:event:login"));
    assert!(table.contains("\teiam:event:login:portal\tPortal login"));

    let csv = CsvFormatter.format_event_types(&groups).unwrap();
    assert_eq!(
        csv,
        "group_code,group_name,code,name\neiam:event:login,Login,eiam:event:login:portal,Portal login\n"
    );

    let json: serde_json::Value =
        serde_json::from_str(&JsonFormatter.format_event_types(&groups).unwrap()).unwrap();
    assert_eq!(json[0]["types"][0]["code"], "eiam:event:login:portal");

    assert_eq!(
        TableFormatter.format_event_types(&[]).unwrap(),
        "No audit event types available."
    );
}

#[test]
fn test_profiles_never_render_secrets() {
    let profiles = profiles();
    for formatter in [
        get_formatter(OutputFormat::Table),
        get_formatter(OutputFormat::Json),
        get_formatter(OutputFormat::Csv),
    ] {
        let output = formatter.format_profiles(&profiles).unwrap();
        assert!(!output.contains("plain-secret-value"));
        assert!(!output.contains("prod-token"));
        assert!(output.contains(REDACTED));
        assert!(output.contains("https://eiam.example.com"));
    }
}

#[test]
fn test_profiles_json_structure() {
    let json = JsonFormatter.format_profiles(&profiles()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["profiles"]["prod"]["password"], "****");
    assert_eq!(parsed["profiles"]["prod"]["audit_page_size"], 25);
    assert!(parsed["profiles"]["prod"]["skip_verify"].is_null());
}

#[test]
fn test_empty_profiles_table_hint() {
    let output = TableFormatter.format_profiles(&BTreeMap::new()).unwrap();
    assert!(output.contains("eiam-cli config set"));
}

#[test]
fn test_login_and_public_key() {
    let login = LoginOutput::authenticated("http://localhost:1989", "alice");
    assert_eq!(
        TableFormatter.format_login(&login).unwrap(),
        "Login succeeded for 'alice' at http://localhost:1989"
    );
    let json: serde_json::Value =
        serde_json::from_str(&JsonFormatter.format_login(&login).unwrap()).unwrap();
    assert_eq!(json["status"], "authenticated");

    let key = PublicKeyInfo {
        key_id: "k1".to_string(),
        public_key: "-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n".to_string(),
    };
    let table = TableFormatter.format_public_key(&key).unwrap();
    assert!(table.starts_with("Key ID:      k1"));
    assert!(table.ends_with("-----END PUBLIC KEY-----"));

    let csv = CsvFormatter.format_public_key(&key).unwrap();
    assert!(csv.starts_with("key_id,public_key\nk1,\"-----BEGIN PUBLIC KEY-----"));
}

#[test]
fn test_escape_csv() {
    assert_eq!(escape_csv("plain"), "plain");
    assert_eq!(escape_csv("a,b"), "\"a,b\"");
    assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    assert_eq!(escape_csv("line\nbreak"), "\"line\nbreak\"");
}

#[test]
fn test_write_to_file_creates_parents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out.json");
    common::write_to_file("{\"ok\":true}", &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"ok\":true}");
}
