//! Presentation of SSO outcomes.
//!
//! The core hands over plain data (`RelayReport` or `AppError`); this module
//! turns it into HTML, JSON or plain text depending on the negotiated format.
//! JSON failures go through `AppError`'s `ResponseError` so they share the
//! problem+json shape with every other error.

pub mod html;

use actix_web::http::header::ContentType;
use actix_web::HttpResponse;

use crate::error::AppError;
use crate::extractors::ResponseFormat;
use crate::relay::RelayReport;
use crate::trace_ctx;

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

pub fn success(format: ResponseFormat, report: &RelayReport) -> HttpResponse {
    match format {
        ResponseFormat::Json => HttpResponse::Ok().json(report),
        ResponseFormat::Html => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(html::success(
                report,
                &pretty(&report.sent),
                &pretty(&report.response),
            )),
        ResponseFormat::Text => HttpResponse::Ok()
            .content_type(ContentType::plaintext())
            .body(format!(
                "URL: {}\nPost Data: {}\nResponse Data: {}\n",
                report.destination,
                pretty(&report.sent),
                pretty(&report.response)
            )),
    }
}

pub fn failure(format: ResponseFormat, error: AppError) -> Result<HttpResponse, AppError> {
    let trace_id = trace_ctx::trace_id();
    match format {
        ResponseFormat::Json => Err(error),
        ResponseFormat::Html => Ok(HttpResponse::build(error.status())
            .content_type(ContentType::html())
            .insert_header(("x-trace-id", trace_id.clone()))
            .body(html::failure(&error, &trace_id))),
        ResponseFormat::Text => {
            let mut body = format!("{}: {}\n", error.code(), error.detail());
            if let Some(hint) = error.hint() {
                body.push_str(&format!("Try again: {hint}\n"));
            }
            Ok(HttpResponse::build(error.status())
                .content_type(ContentType::plaintext())
                .insert_header(("x-trace-id", trace_id))
                .body(body))
        }
    }
}
