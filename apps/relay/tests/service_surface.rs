mod common;

use actix_web::http::header::CACHE_CONTROL;
use actix_web::http::StatusCode;
use actix_web::test;
use common::*;
use serde_json::Value;

fn header<'a>(resp: &'a actix_web::dev::ServiceResponse, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}

#[actix_web::test]
async fn health_reports_ok() {
    let app = create_test_app(test_state(&[])).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["app_version"], env!("CARGO_PKG_VERSION"));
    let time = body["time"].as_str().unwrap_or_default();
    assert!(
        time::OffsetDateTime::parse(time, &time::format_description::well_known::Rfc3339).is_ok(),
        "time should be RFC 3339, got {time}"
    );
}

#[actix_web::test]
async fn every_response_carries_security_headers() {
    let app = create_test_app(test_state(&[])).await;

    for uri in ["/health", "/", "/nope"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(header(&resp, "x-content-type-options"), Some("nosniff"), "{uri}");
        assert_eq!(header(&resp, "x-frame-options"), Some("DENY"), "{uri}");
        assert_eq!(header(&resp, "referrer-policy"), Some("no-referrer"), "{uri}");
        assert!(header(&resp, "content-security-policy").is_some(), "{uri}");
        assert_eq!(
            resp.headers().get(CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some("no-store"),
            "{uri}"
        );
    }
}

#[actix_web::test]
async fn request_id_is_generated_or_propagated() {
    let app = create_test_app(test_state(&[])).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    let generated = header(&resp, "x-request-id").unwrap_or_default();
    assert!(uuid::Uuid::parse_str(generated).is_ok(), "got {generated}");

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("x-request-id", "edge-1234_abc"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(header(&resp, "x-request-id"), Some("edge-1234_abc"));

    // Anything that does not look like an id is replaced.
    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("x-request-id", "<script>"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let replaced = header(&resp, "x-request-id").unwrap_or_default();
    assert_ne!(replaced, "<script>");
    assert!(uuid::Uuid::parse_str(replaced).is_ok());
}

#[actix_web::test]
async fn inbound_request_id_reaches_problem_details() {
    let app = create_test_app(test_state(&[])).await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(("accept", "application/json"))
        .insert_header(("x-request-id", "corr-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body = assert_problem_details(resp, 403, "MISSING_TOKEN").await;
    assert_eq!(body["trace_id"], "corr-42");
}

#[actix_web::test]
async fn unknown_route_is_problem_details_404() {
    let app = create_test_app(test_state(&[])).await;

    let req = test::TestRequest::get().uri("/does/not/exist").to_request();
    let resp = test::call_service(&app, req).await;

    let body = assert_problem_details(resp, 404, "NOT_FOUND").await;
    assert_eq!(body["title"], "Not Found");
}
