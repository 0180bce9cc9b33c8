//! HTML fragments for browser callers. Every interpolated value is escaped.

use actix_web::http::StatusCode;

use crate::error::AppError;
use crate::relay::RelayReport;

/// Minimal HTML escaping for text and double-quoted attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

pub fn success(report: &RelayReport, sent_json: &str, response_json: &str) -> String {
    let body = format!(
        concat!(
            "<div>\n",
            "<h6>Token-Based API Request</h6>\n",
            "<ul class=\"list-group\">\n",
            "<li class=\"list-group-item\"><strong>URL</strong>: {url}</li>\n",
            "<li class=\"list-group-item\"><strong>Post Data:</strong>\n<pre><code>{sent}</code></pre></li>\n",
            "<li class=\"list-group-item\"><strong>Response Data:</strong>\n<pre><code>{response}</code></pre></li>\n",
            "</ul>\n",
            "</div>"
        ),
        url = escape(&report.destination),
        sent = escape(sent_json),
        response = escape(response_json),
    );
    page("SSO relay", &body)
}

pub fn failure(error: &AppError, trace_id: &str) -> String {
    let hint = error
        .hint()
        .map(|link| {
            format!(
                "<p>It's possible that you may not have a token - try again: <a href=\"{0}\">{0}</a></p>\n",
                escape(link)
            )
        })
        .unwrap_or_default();

    let body = format!(
        concat!(
            "<div role=\"alert\">\n",
            "<p>{headline}</p>\n",
            "<pre><code>{code}: {detail}</code></pre>\n",
            "{hint}",
            "<p><small>Trace: {trace}</small></p>\n",
            "</div>"
        ),
        headline = if error.status() == StatusCode::FORBIDDEN {
            "Invalid token or API call failed"
        } else {
            "The partner API call failed"
        },
        code = escape(error.code().as_str()),
        detail = escape(&error.detail()),
        hint = hint,
        trace = escape(trace_id),
    );
    page("SSO relay error", &body)
}
