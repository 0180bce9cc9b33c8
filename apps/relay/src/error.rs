use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::{ErrorCode, SsoError};
use crate::trace_ctx;

/// RFC 7807 problem details body.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
    /// Where to obtain a fresh token, for authentication failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{error}")]
    Sso {
        error: SsoError,
        hint: Option<String>,
    },
    #[error("Not found: {detail}")]
    NotFound { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Sso { error, .. } => error.code(),
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Caller-facing detail. Internal and config failures stay generic.
    pub fn detail(&self) -> String {
        match self {
            AppError::Sso { error, .. } => error.to_string(),
            AppError::NotFound { detail } => detail.clone(),
            AppError::Internal { .. } | AppError::Config { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Sso { error, .. } => error.status(),
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            AppError::Sso { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    /// Wrap an SSO failure; the hint is kept only where re-authenticating helps.
    pub fn sso(error: SsoError, hint: Option<String>) -> Self {
        let hint = hint.filter(|_| error.suggests_reauth());
        Self::Sso { error, hint }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn problem_details(&self) -> ProblemDetails {
        let code = self.code();
        let status = self.status();
        ProblemDetails {
            type_: format!("https://sso-relay.dev/errors/{}", code.as_str()),
            title: Self::humanize_code(code.as_str()),
            status: status.as_u16(),
            detail: self.detail(),
            code: code.as_str().to_string(),
            trace_id: trace_ctx::trace_id(),
            hint: self.hint().map(str::to_string),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<SsoError> for AppError {
    fn from(error: SsoError) -> Self {
        AppError::sso(error, None)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let problem_details = self.problem_details();
        let trace_id = problem_details.trace_id.clone();

        HttpResponse::build(self.status())
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}
