//! The SSO relay flow: validate, then relay.
//!
//! ```text
//! Received → Validating ─┬─ ValidationFailed
//!                        └─ Validated → Relaying ─┬─ RelayFailed
//!                                                 └─ Relayed
//! ```
//!
//! Nothing is persisted between stages; the whole machine lives inside one
//! request future. The result is tagged by the stage that failed, so callers
//! branch on `SsoError::Validation` vs `SsoError::Relay`.

use std::fmt;

use tracing::{debug, info, warn};

use crate::auth::jwt::validate_token;
use crate::errors::SsoError;
use crate::logging::security;
use crate::relay::RelayReport;
use crate::state::app_state::AppState;

/// Stage reached by a request, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SsoStage {
    Validating,
    Relaying,
}

impl fmt::Display for SsoStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SsoStage::Validating => "validating",
            SsoStage::Relaying => "relaying",
        })
    }
}

impl SsoError {
    /// Stage at which the request stopped.
    pub fn stage(&self) -> SsoStage {
        match self {
            SsoError::Validation(_) => SsoStage::Validating,
            SsoError::Relay(_) => SsoStage::Relaying,
        }
    }
}

/// Run the full flow for one inbound token.
pub async fn authenticate_and_relay(
    token: Option<&str>,
    state: &AppState,
) -> Result<RelayReport, SsoError> {
    debug!(stage = %SsoStage::Validating, "sso request received");

    let raw_token = token.unwrap_or_default().trim();
    let claims = validate_token(raw_token, &state.security).map_err(|e| {
        let error = SsoError::from(e);
        security::token_rejected(&error, token);
        error
    })?;

    info!(
        stage = %SsoStage::Relaying,
        user_id = claims.user_id(),
        host_id = claims.host_id(),
        "token validated"
    );

    state
        .relay
        .relay(&claims, &state.security.jwt_secret, raw_token)
        .await
        .map_err(|e| {
            let error = SsoError::from(e);
            warn!(
                stage = %error.stage(),
                code = %error.code(),
                reason = error.reason().unwrap_or_default(),
                "relay failed"
            );
            error
        })
}
