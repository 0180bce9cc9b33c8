use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Token supplied with an SSO request, if any.
///
/// Looked up in the query parameter named by `TOKEN_NAME` first, then in an
/// `Authorization: Bearer` header. Absence is not an extraction error: the
/// flow reports it as `MissingToken` so it renders like every other
/// authentication failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SsoToken(pub Option<String>);

impl SsoToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    fn from_query(req: &HttpRequest, param: &str) -> Option<String> {
        url::form_urlencoded::parse(req.query_string().as_bytes())
            .find(|(name, _)| name == param)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn from_bearer(req: &HttpRequest) -> Option<String> {
        let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
        let mut parts = value.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
                Some(token.to_string())
            }
            _ => None,
        }
    }
}

impl FromRequest for SsoToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(AppError::internal("AppState not found")));
        };

        let token =
            Self::from_query(req, &state.token_param).or_else(|| Self::from_bearer(req));
        ready(Ok(SsoToken(token)))
    }
}
