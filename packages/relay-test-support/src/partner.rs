//! Stub post-back partner.
//!
//! A real HTTP server bound to a random local port. Every request it receives
//! is recorded so tests can assert on what the relay sent (or that nothing was
//! sent at all).

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use parking_lot::Mutex;
use serde_json::Value;

/// How the stub answers a post-back.
#[derive(Debug, Clone)]
pub enum PartnerBehavior {
    /// 200 with the given JSON body.
    Json(Value),
    /// 200 `text/plain` with the given body.
    Text(String),
    /// The given status with a small JSON body.
    Status(u16),
    /// 200 `application/json` whose body is not valid JSON.
    InvalidJson,
    /// Sleep before answering `{"ok":true}`.
    Delay(Duration),
}

/// A request observed by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct PartnerState {
    behavior: PartnerBehavior,
    received: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct StubPartner {
    addr: SocketAddr,
    handle: ServerHandle,
    received: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubPartner {
    /// Start the stub on `127.0.0.1:0`. Must be called inside a Tokio/actix runtime.
    pub fn start(behavior: PartnerBehavior) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = web::Data::new(PartnerState {
            behavior,
            received: received.clone(),
        });

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .default_service(web::route().to(handle_postback))
        })
        .workers(1)
        .listen(listener)?
        .run();

        let handle = server.handle();
        tokio::spawn(server);

        Ok(Self {
            addr,
            handle,
            received,
        })
    }

    /// Absolute `http://` URL for the given path on the stub.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn received(&self) -> Vec<RecordedRequest> {
        self.received.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.received.lock().len()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

async fn handle_postback(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<PartnerState>,
) -> HttpResponse {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.received.lock().push(RecordedRequest {
        path: req.path().to_string(),
        content_type: header("content-type"),
        user_agent: header("user-agent"),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    match &state.behavior {
        PartnerBehavior::Json(value) => HttpResponse::Ok().json(value),
        PartnerBehavior::Text(text) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(text.clone()),
        PartnerBehavior::Status(code) => {
            let status = StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            HttpResponse::build(status).json(serde_json::json!({ "error": "partner failure" }))
        }
        PartnerBehavior::InvalidJson => HttpResponse::Ok()
            .content_type("application/json")
            .body("{not json"),
        PartnerBehavior::Delay(delay) => {
            tokio::time::sleep(*delay).await;
            HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
        }
    }
}
