use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::extractors::{ResponseFormat, SsoToken};
use crate::render;
use crate::services::sso::authenticate_and_relay;
use crate::state::app_state::AppState;

/// `GET /`: validate the supplied token and relay it to its post-back URL.
async fn relay_sso(
    token: SsoToken,
    format: ResponseFormat,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    match authenticate_and_relay(token.as_deref(), &app_state).await {
        Ok(report) => Ok(render::success(format, &report)),
        Err(error) => render::failure(format, AppError::sso(error, app_state.sso_hint())),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(relay_sso));
}
