#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Single-sign-on relay.
//!
//! Validates an identity-provider token (`auth`), then posts the verified
//! identity to the token's post-back URL (`relay`). `services::sso` composes
//! the two; everything else is web plumbing around that flow.

pub mod auth;
pub mod config;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod logging;
pub mod middleware;
pub mod relay;
pub mod render;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::{validate_token, SsoClaims};
pub use config::Config;
pub use error::AppError;
pub use errors::{ErrorCode, RelayError, SsoError, ValidationError};
pub use relay::{derive_key, DerivedKey, RelayClient, RelayReport};
pub use services::sso::authenticate_and_relay;
pub use state::{AppState, SecurityConfig};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    relay_test_support::logging::init();
}
