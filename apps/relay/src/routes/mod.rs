use actix_web::{web, HttpRequest, HttpResponse};

use crate::error::AppError;

pub mod health;
pub mod sso;

async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::not_found(format!("No route for {} {}", req.method(), req.path())))
}

/// Register every route. `main.rs` wraps the app in the tracing and security
/// middleware; tests can mount the same configuration directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(sso::configure_routes)
        .default_service(web::route().to(not_found));
}
