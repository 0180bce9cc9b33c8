#![allow(dead_code)]

// tests/common/mod.rs
use std::collections::HashMap;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::{HeaderName, CONTENT_TYPE};
use actix_web::{test, web, App};
use relay_test_support::TokenBuilder;
use serde_json::Value;
use sso_relay::config::Config;
use sso_relay::middleware::{RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan};
use sso_relay::routes;
use sso_relay::state::AppState;

pub const SECRET: &str = "test_secret_key_for_testing_purposes_only";
pub const ISSUER: &str = "https://idp.example";
pub const AUDIENCE: &str = "app.example";
pub const SSO_PATH: &str = "/sso/start";
pub const USER_AGENT: &str = "Partner SSO Relay/1.0";

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    relay_test_support::logging::init();
}

/// Environment as the binary would see it, with overrides applied.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut env: HashMap<String, String> = [
        ("SECRET_KEY", SECRET),
        ("ISSUER_DOMAIN", ISSUER),
        ("AUDIENCE_DOMAIN", AUDIENCE),
        ("SSO_PATH", SSO_PATH),
        // The stub partner listens on plain http at 127.0.0.1.
        ("RELAY_ALLOW_HTTP", "true"),
        ("RELAY_TIMEOUT_MS", "2000"),
        ("RELAY_USER_AGENT", USER_AGENT),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (k, v) in overrides {
        env.insert(k.to_string(), v.to_string());
    }

    Config::from_lookup(|key| env.get(key).cloned()).expect("test config must load")
}

pub fn test_state(overrides: &[(&str, &str)]) -> AppState {
    AppState::from_config(&test_config(overrides)).expect("test state must build")
}

/// The production middleware stack around the production routes.
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}

/// A token that passes validation and posts back to `post_url`.
pub fn valid_token(post_url: &str) -> String {
    TokenBuilder::new(SECRET)
        .standard_valid_claims(ISSUER, AUDIENCE)
        .post_url(post_url)
        .sign()
}

pub fn sso_uri(token: &str) -> String {
    format!("/?token={token}")
}

/// Validate the problem+json shape and return the parsed body.
pub async fn assert_problem_details(
    resp: ServiceResponse<BoxBody>,
    expected_status: u16,
    expected_code: &str,
) -> Value {
    assert_eq!(resp.status().as_u16(), expected_status);

    let headers = resp.headers().clone();
    let trace_id = headers
        .get(HeaderName::from_static("x-trace-id"))
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present")
        .to_string();
    let request_id = headers
        .get(HeaderName::from_static("x-request-id"))
        .and_then(|v| v.to_str().ok())
        .expect("x-request-id header should be present");
    assert_eq!(trace_id, request_id, "trace id header should match request id");

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    let body: Value = test::read_body_json(resp).await;
    for key in ["type", "title", "status", "detail", "code", "trace_id"] {
        assert!(body.get(key).is_some(), "missing `{key}` in {body}");
    }
    assert_eq!(body["status"], expected_status);
    assert_eq!(body["code"], expected_code);
    assert_eq!(body["trace_id"], trace_id.as_str());
    body
}
