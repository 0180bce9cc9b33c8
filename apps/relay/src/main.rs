use actix_web::{web, App, HttpServer};
use sso_relay::config::Config;
use sso_relay::middleware::{RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan};
use sso_relay::routes;
use sso_relay::state::AppState;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Configuration comes from the runtime environment only; it is read once here.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let app_state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.host,
        port = config.port,
        issuer = %config.issuer,
        audience = %config.audience,
        token_param = %config.token_param,
        relay_timeout_ms = config.relay_timeout.as_millis() as u64,
        allow_http = config.allow_http,
        "starting SSO relay"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
