//! In-process stand-in for the EIAM console.
//!
//! Serves the four endpoints the client uses on a wiremock server:
//! - the login public key, from the bundled fixture key pair
//! - login, decrypting the sealed password and checking it against known accounts
//! - the event-type taxonomy
//! - the audit listing, filtered, sorted and paginated over an in-memory dataset
//!
//! Protected endpoints require `Authorization: Bearer <session token>` and
//! answer 401 otherwise.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDateTime;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use crate::endpoints::{AUDIT_EVENT_TYPES_PATH, AUDIT_PATH, LOGIN_PATH, PUBLIC_SECRET_PATH};
use crate::serde_helpers::EVENT_TIME_FORMAT;

pub const FIXTURE_IDENTIFIER: &str = "alice";
pub const FIXTURE_SECRET: &str = "correct";
pub const FIXTURE_KEY_ID: &str = "fixture-login-key";
pub const FIXTURE_SESSION_TOKEN: &str = "fixture-session-token";

const PRIVATE_KEY_PEM: &str = include_str!("../../fixtures/keys/login_private_key.pem");
const PUBLIC_KEY_PEM: &str = include_str!("../../fixtures/keys/login_public_key.pem");
const AUDIT_EVENTS: &str = include_str!("../../fixtures/audit/audit_events.json");
const EVENT_TYPES: &str = include_str!("../../fixtures/audit/event_types.json");

/// A running fixture console.
pub struct FixtureServer {
    server: MockServer,
}

impl FixtureServer {
    /// Start with the bundled audit dataset and the `alice`/`correct` account.
    pub async fn start() -> Self {
        let records: Vec<Value> =
            serde_json::from_str(AUDIT_EVENTS).expect("Invalid JSON in audit dataset fixture");
        Self::start_with_records(records).await
    }

    /// Start with a custom audit dataset.
    pub async fn start_with_records(records: Vec<Value>) -> Self {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PUBLIC_SECRET_PATH))
            .and(query_param("type", "login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": {"keyId": FIXTURE_KEY_ID, "publicKey": PUBLIC_KEY_PEM}
            })))
            .mount(&server)
            .await;

        let private_key = RsaPrivateKey::from_pkcs8_pem(PRIVATE_KEY_PEM)
            .expect("fixture private key is valid PKCS#8");
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(LoginResponder {
                private_key,
                accounts: HashMap::from([(
                    FIXTURE_IDENTIFIER.to_string(),
                    FIXTURE_SECRET.to_string(),
                )]),
            })
            .mount(&server)
            .await;

        let event_types: Value =
            serde_json::from_str(EVENT_TYPES).expect("Invalid JSON in event types fixture");
        Mock::given(method("GET"))
            .and(path(AUDIT_EVENT_TYPES_PATH))
            .respond_with(EventTypesResponder { body: event_types })
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(AUDIT_PATH))
            .respond_with(AuditResponder { records })
            .mount(&server)
            .await;

        Self { server }
    }

    /// Base URL to point a client at.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Requests received so far on `endpoint_path`.
    pub async fn requests_to(&self, endpoint_path: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == endpoint_path)
            .collect()
    }
}

struct LoginResponder {
    private_key: RsaPrivateKey,
    accounts: HashMap<String, String>,
}

impl LoginResponder {
    fn open(&self, sealed: &str) -> Option<String> {
        let ciphertext = STANDARD.decode(sealed).ok()?;
        let plain = self.private_key.decrypt(Pkcs1v15Encrypt, &ciphertext).ok()?;
        String::from_utf8(plain).ok()
    }
}

impl Respond for LoginResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let fields: HashMap<String, String> = url::form_urlencoded::parse(&request.body)
            .into_owned()
            .collect();

        let key_matches = fields.get("keyId").map(String::as_str) == Some(FIXTURE_KEY_ID);
        let accepted = key_matches
            && match (fields.get("username"), fields.get("password")) {
                (Some(username), Some(sealed)) => self
                    .open(sealed)
                    .is_some_and(|secret| self.accounts.get(username) == Some(&secret)),
                _ => false,
            };

        if accepted {
            ResponseTemplate::new(200)
                .insert_header(
                    "set-cookie",
                    format!("EIAMSESSION={FIXTURE_SESSION_TOKEN}; Path=/; HttpOnly"),
                )
                .set_body_json(json!({"success": true, "result": FIXTURE_SESSION_TOKEN}))
        } else {
            ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "errorCode": "login_failed",
                "errorMessage": "invalid credentials"
            }))
        }
    }
}

fn is_authorized(request: &Request) -> bool {
    request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {FIXTURE_SESSION_TOKEN}"))
}

fn unauthorized() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({
        "success": false,
        "errorCode": "unauthorized",
        "errorMessage": "session expired"
    }))
}

fn bad_request(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
        "success": false,
        "errorCode": "invalid_param",
        "errorMessage": message
    }))
}

struct EventTypesResponder {
    body: Value,
}

impl Respond for EventTypesResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        if !is_authorized(request) {
            return unauthorized();
        }
        ResponseTemplate::new(200).set_body_json(self.body.clone())
    }
}

struct AuditResponder {
    records: Vec<Value>,
}

fn event_time(record: &Value) -> &str {
    record.get("eventTime").and_then(Value::as_str).unwrap_or("")
}

impl Respond for AuditResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        if !is_authorized(request) {
            return unauthorized();
        }

        let pairs: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
        let param = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };
        let event_types: Vec<&str> = pairs
            .iter()
            .filter(|(k, _)| k == "eventType")
            .map(|(_, v)| v.as_str())
            .collect();

        let page: usize = match param("page").unwrap_or("1").parse() {
            Ok(p) if p >= 1 => p,
            _ => return bad_request("page must be a positive integer"),
        };
        let page_size: usize = match param("pageSize").unwrap_or("10").parse() {
            Ok(s) if s >= 1 => s,
            _ => return bad_request("pageSize must be a positive integer"),
        };
        let user_type = param("userType").unwrap_or("user");

        let parse_bound = |name: &str| {
            param(name).map(|raw| NaiveDateTime::parse_from_str(raw, EVENT_TIME_FORMAT))
        };
        let (start, end) = match (parse_bound("eventTimeStart"), parse_bound("eventTimeEnd")) {
            (Some(Ok(s)), Some(Ok(e))) => (Some(s), Some(e)),
            (None, None) => (None, None),
            _ => return bad_request("eventTimeStart and eventTimeEnd must be sent together"),
        };

        let mut matching: Vec<&Value> = self
            .records
            .iter()
            .filter(|r| {
                let record_type = r.get("eventType").and_then(Value::as_str).unwrap_or("");
                event_types.is_empty() || event_types.contains(&record_type)
            })
            .filter(|r| r.get("userType").and_then(Value::as_str).unwrap_or("user") == user_type)
            .filter(|r| match (start, end) {
                (Some(s), Some(e)) => {
                    NaiveDateTime::parse_from_str(event_time(r), EVENT_TIME_FORMAT)
                        .is_ok_and(|t| s <= t && t <= e)
                }
                _ => true,
            })
            .collect();

        if param("sortOrder") == Some("ascend") {
            matching.sort_by(|a, b| event_time(a).cmp(event_time(b)));
        } else {
            matching.sort_by(|a, b| event_time(b).cmp(event_time(a)));
        }

        let total = matching.len();
        let list: Vec<&Value> = matching
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": {"list": list, "total": total}
        }))
    }
}
