//! Login endpoints.
//!
//! Responsibilities:
//! - Fetch the login public key.
//! - Submit a sealed credential and classify the reply.
//!
//! Invariants:
//! - Any HTTP response whose body is an envelope yields a [`LoginOutcome`];
//!   a rejection is `Ok(LoginOutcome::Rejected)`, never an error.
//! - Failures without a response, or with a non-envelope body, are errors so a
//!   network fault is never reported as bad credentials.

use reqwest::Client;
use tracing::{debug, info};

use crate::endpoints::{LOGIN_PATH, PUBLIC_SECRET_PATH, read_envelope, send_request};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{LoginOutcome, PublicKeyInfo, SealedCredential, SessionToken};

/// Fetch the public key used to encrypt the login secret.
///
/// Idempotent; the only effect is the network call.
pub async fn fetch_login_public_secret(
    client: &Client,
    base_url: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<PublicKeyInfo> {
    debug!("Fetching login public key");

    let url = format!("{}{}", base_url, PUBLIC_SECRET_PATH);
    let builder = client.get(&url).query(&[("type", "login")]);
    let response = send_request(builder, PUBLIC_SECRET_PATH, "GET", metrics).await?;

    let result = read_envelope::<PublicKeyInfo>(response)
        .await
        .and_then(|r| r.into_payload());

    if let (Err(e), Some(m)) = (&result, metrics) {
        m.record_client_error(PUBLIC_SECRET_PATH, "GET", e);
    }
    result
}

/// Submit a sealed credential to the login endpoint.
///
/// On success the server also sets its session cookie, which the HTTP
/// client's cookie store keeps for the life of the client.
pub async fn submit_login(
    client: &Client,
    base_url: &str,
    credential: &SealedCredential,
    metrics: Option<&MetricsCollector>,
) -> Result<LoginOutcome> {
    debug!(
        identifier = credential.identifier(),
        key_id = credential.key_id(),
        "Submitting login"
    );

    let url = format!("{}{}", base_url, LOGIN_PATH);
    let builder = client.post(&url).form(&credential.form_fields());
    let response = send_request(builder, LOGIN_PATH, "POST", metrics).await?;
    let reply = read_envelope::<String>(response).await?;

    let outcome = match reply.envelope {
        Some(envelope) if envelope.success => match envelope.result {
            Some(token) if !token.is_empty() => LoginOutcome::Authenticated(SessionToken::new(token)),
            _ => {
                let err = ClientError::InvalidResponse(
                    "Login succeeded without a session token".to_string(),
                );
                if let Some(m) = metrics {
                    m.record_client_error(LOGIN_PATH, "POST", &err);
                }
                return Err(err);
            }
        },
        Some(envelope) => LoginOutcome::Rejected {
            error_code: envelope.error_code,
            error_message: envelope
                .error_message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "login rejected".to_string()),
        },
        None => {
            let err = reply.not_an_envelope();
            if let Some(m) = metrics {
                m.record_client_error(LOGIN_PATH, "POST", &err);
            }
            return Err(err);
        }
    };

    match &outcome {
        LoginOutcome::Authenticated(_) => {
            info!(identifier = credential.identifier(), "Login accepted");
        }
        LoginOutcome::Rejected { error_code, .. } => {
            info!(
                identifier = credential.identifier(),
                status = reply.status,
                error_code = error_code.as_deref().unwrap_or("-"),
                "Login rejected"
            );
        }
    }

    if let Some(m) = metrics {
        m.record_login_outcome(outcome.is_authenticated());
    }

    Ok(outcome)
}
