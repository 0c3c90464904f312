//! Request sending and envelope decoding shared by all endpoints.
//!
//! Responsibilities:
//! - Send one request, with trace context and request metrics.
//! - Classify send failures into timeout, connection, and TLS errors.
//! - Decode the response body into an [`ApiEnvelope`] when it is one.
//!
//! Does NOT handle:
//! - Retries. Every call is a single round trip.
//!
//! Invariants:
//! - Every request is counted, and its duration is recorded with the status
//!   (or `error` when no response arrived).

use std::time::Instant;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::ApiEnvelope;
use crate::tracing::inject_trace_context;

/// Longest body excerpt carried in an error message.
const BODY_PREVIEW_CHARS: usize = 200;

/// Send a request once and return the response whatever its status.
///
/// # Errors
///
/// Returns [`ClientError::Timeout`], [`ClientError::ConnectionRefused`],
/// [`ClientError::Tls`], or [`ClientError::Transport`] when no HTTP response
/// was received.
pub async fn send_request(
    builder: RequestBuilder,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    let builder = inject_trace_context(builder);

    if let Some(m) = metrics {
        m.record_request(endpoint, method);
    }

    let start = Instant::now();
    match builder.send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            debug!(endpoint, method, status, "Received response");
            if let Some(m) = metrics {
                m.record_request_duration(endpoint, method, start.elapsed(), Some(status));
            }
            Ok(response)
        }
        Err(e) => {
            let target = e
                .url()
                .map(|u| match (u.host_str(), u.port_or_known_default()) {
                    (Some(host), Some(port)) => format!("{host}:{port}"),
                    _ => u.to_string(),
                })
                .unwrap_or_else(|| endpoint.to_string());
            let err = ClientError::from_send_error(e, &target, start.elapsed());
            debug!(endpoint, method, error = %err, "Request failed without a response");
            if let Some(m) = metrics {
                m.record_request_duration(endpoint, method, start.elapsed(), None);
                m.record_client_error(endpoint, method, &err);
            }
            Err(err)
        }
    }
}

/// A response body read as an envelope, if it is one.
#[derive(Debug)]
pub(crate) struct EnvelopeResponse<T> {
    pub status: u16,
    pub url: String,
    pub envelope: Option<ApiEnvelope<T>>,
    pub body: String,
}

/// Read the body and try to decode it as `ApiEnvelope<T>`.
pub(crate) async fn read_envelope<T: DeserializeOwned>(
    response: Response,
) -> Result<EnvelopeResponse<T>> {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let body = response.text().await?;
    let envelope = serde_json::from_str::<ApiEnvelope<T>>(&body).ok();

    Ok(EnvelopeResponse {
        status,
        url,
        envelope,
        body,
    })
}

impl<T> EnvelopeResponse<T> {
    /// True for a 2xx status.
    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Error for a body that is not an envelope.
    pub fn not_an_envelope(&self) -> ClientError {
        if self.is_success_status() {
            ClientError::InvalidResponse(format!(
                "Response from {} is not an API envelope: {}",
                self.url,
                preview(&self.body)
            ))
        } else {
            ClientError::Api {
                status: self.status,
                url: self.url.clone(),
                error_code: None,
                message: preview(&self.body),
            }
        }
    }

    /// Extract the payload of a protected endpoint.
    ///
    /// 401 becomes [`ClientError::Unauthorized`]; failure envelopes become
    /// [`ClientError::Api`].
    pub fn into_payload(self) -> Result<T> {
        if self.status == 401 {
            let message = self
                .envelope
                .and_then(|e| e.error_message)
                .unwrap_or_else(|| format!("session rejected by {}", self.url));
            return Err(ClientError::Unauthorized(message));
        }

        match self.envelope {
            Some(envelope) => envelope.into_result(self.status, &self.url),
            None => Err(self.not_an_envelope()),
        }
    }
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    let mut out: String = trimmed.chars().take(BODY_PREVIEW_CHARS).collect();
    if trimmed.chars().count() > BODY_PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> EnvelopeResponse<String> {
        EnvelopeResponse {
            status,
            url: "http://localhost/api/v1/audit".to_string(),
            envelope: serde_json::from_str(body).ok(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_into_payload_success() {
        let r = response(200, r#"{"success": true, "result": "ok"}"#);
        assert_eq!(r.into_payload().unwrap(), "ok");
    }

    #[test]
    fn test_into_payload_401_is_unauthorized() {
        let r = response(401, r#"{"success": false, "errorMessage": "token expired"}"#);
        match r.into_payload() {
            Err(ClientError::Unauthorized(msg)) => assert_eq!(msg, "token expired"),
            other => panic!("Expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn test_into_payload_html_error_page() {
        let r = response(502, "<html>Bad Gateway</html>");
        match r.into_payload() {
            Err(ClientError::Api {
                status, message, ..
            }) => {
                assert_eq!(status, 502);
                assert!(message.contains("Bad Gateway"));
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_into_payload_non_envelope_ok_is_invalid() {
        let r = response(200, r#"{"token": "x"}"#);
        assert!(matches!(
            r.into_payload(),
            Err(ClientError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(500);
        let p = preview(&long);
        assert_eq!(p.len(), BODY_PREVIEW_CHARS + 3);
        assert_eq!(preview("   "), "<empty body>");
    }
}
