use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::redirect;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::claims::SsoClaims;
use crate::config::Config;
use crate::errors::RelayError;
use crate::logging::security;
use crate::relay::destination::DestinationPolicy;
use crate::relay::key::{derive_key, DerivedKey};

/// Largest post-back response body the relay will buffer.
pub const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// JSON body posted to the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayRequest {
    pub key: DerivedKey,
    pub jwt: String,
}

/// Post-back answer, kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RelayResponse {
    Json(Value),
    Text(String),
}

/// Everything a presentation layer needs to show a completed relay.
#[derive(Debug, Clone, Serialize)]
pub struct RelayReport {
    pub destination: String,
    pub status: u16,
    pub sent: RelayRequest,
    pub response: RelayResponse,
}

/// Outbound half of the SSO flow: one POST per call, never retried.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    policy: DestinationPolicy,
}

impl RelayClient {
    /// Redirects are not followed: a 3xx would otherwise let the destination
    /// bounce the relay to a host the policy never saw.
    pub fn new(
        policy: DestinationPolicy,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(user_agent)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self { http, policy })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            DestinationPolicy::new(config.allow_http, config.allowed_hosts.clone()),
            config.relay_timeout,
            &config.user_agent,
        )
    }

    /// Post `{key, jwt}` to the verified token's `post_url`.
    ///
    /// The destination is vetted first; an untrusted destination returns
    /// without touching the network.
    pub async fn relay(
        &self,
        claims: &SsoClaims,
        secret: &[u8],
        raw_token: &str,
    ) -> Result<RelayReport, RelayError> {
        let destination = self.policy.check(claims.post_url()).inspect_err(|e| {
            if let RelayError::UntrustedDestination { reason } = e {
                let host = url::Url::parse(claims.post_url()).ok();
                security::destination_rejected(host.as_ref().and_then(|u| u.host_str()), reason);
            }
        })?;

        let sent = RelayRequest {
            key: derive_key(secret, raw_token),
            jwt: raw_token.to_string(),
        };

        let host = destination.host_str().unwrap_or_default().to_string();
        let started = Instant::now();
        debug!(%host, user_id = claims.user_id(), host_id = claims.host_id(), "relaying verified identity");

        let response = self
            .http
            .post(destination.clone())
            .header(ACCEPT, "application/json, text/plain;q=0.9, */*;q=0.1")
            .json(&sent)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%host, status = status.as_u16(), "post-back returned non-success status");
            return Err(RelayError::NonSuccessStatus {
                status: status.as_u16(),
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_json_content_type);

        let body = read_limited(response).await?;
        let parsed = if is_json {
            serde_json::from_slice(&body)
                .map(RelayResponse::Json)
                .map_err(|e| RelayError::ResponseParseFailure {
                    reason: format!("invalid JSON at line {} column {}", e.line(), e.column()),
                })?
        } else {
            RelayResponse::Text(String::from_utf8_lossy(&body).into_owned())
        };

        info!(
            %host,
            status = status.as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "post-back completed"
        );

        // Reported as written in the claim; the parsed form is only for sending.
        Ok(RelayReport {
            destination: claims.post_url().trim().to_string(),
            status: status.as_u16(),
            sent,
            response: parsed,
        })
    }
}

/// `application/json` or any `+json` structured suffix, parameters ignored.
fn is_json_content_type(value: &str) -> bool {
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

async fn read_limited(mut response: reqwest::Response) -> Result<Vec<u8>, RelayError> {
    if response
        .content_length()
        .is_some_and(|len| len > MAX_RESPONSE_BYTES as u64)
    {
        return Err(too_large());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
        if body.len() + chunk.len() > MAX_RESPONSE_BYTES {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn too_large() -> RelayError {
    RelayError::ResponseParseFailure {
        reason: format!("response body exceeds {MAX_RESPONSE_BYTES} bytes"),
    }
}

/// Map transport errors without carrying the URL (it can hold query secrets).
fn transport_error(e: reqwest::Error) -> RelayError {
    let e = e.without_url();
    if e.is_timeout() {
        return RelayError::Timeout;
    }
    let reason = if e.is_connect() {
        "connect_failed"
    } else if e.is_body() || e.is_decode() {
        "body_read_failed"
    } else if e.is_request() {
        "request_failed"
    } else {
        "transport_error"
    };
    debug!(error = %e, reason, "post-back transport failure");
    RelayError::ConnectionFailure {
        reason: reason.to_string(),
    }
}
