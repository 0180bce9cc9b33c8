use std::convert::Infallible;
use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest};

/// Representation requested through the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Html,
    Json,
    Text,
}

impl ResponseFormat {
    /// Picks the first recognised media range; browsers (and anything
    /// unrecognised) get HTML.
    pub fn from_accept(accept: &str) -> Self {
        for range in accept.split(',') {
            let media = range
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            match media.as_str() {
                "text/html" | "application/xhtml+xml" => return Self::Html,
                "application/json" | "application/problem+json" => return Self::Json,
                "text/plain" => return Self::Text,
                _ => {}
            }
        }
        Self::Html
    }
}

impl FromRequest for ResponseFormat {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let format = req
            .headers()
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(Self::from_accept)
            .unwrap_or_default();
        ready(Ok(format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_accept() {
        assert_eq!(ResponseFormat::from_accept("application/json"), ResponseFormat::Json);
        assert_eq!(
            ResponseFormat::from_accept("text/plain; charset=utf-8"),
            ResponseFormat::Text
        );
        assert_eq!(
            ResponseFormat::from_accept("text/html,application/xhtml+xml,*/*;q=0.8"),
            ResponseFormat::Html
        );
        assert_eq!(ResponseFormat::from_accept("*/*"), ResponseFormat::Html);
        assert_eq!(
            ResponseFormat::from_accept("image/png, Application/JSON"),
            ResponseFormat::Json
        );
    }
}
