use tracing::warn;

use crate::errors::SsoError;
use crate::logging::redact::Redacted;
use crate::trace_ctx;

/// Log a rejected SSO token.
pub fn token_rejected(error: &SsoError, token: Option<&str>) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        code = %error.code(),
        reason = error.reason().unwrap_or_default(),
        token = %Redacted(token.unwrap_or_default()),
        "SSO token rejected"
    );
}

/// Log a post-back destination refused before any request was sent.
pub fn destination_rejected(host: Option<&str>, reason: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_DESTINATION_REJECTED",
        %trace_id,
        host = host.unwrap_or("-"),
        reason,
        "Post-back destination rejected"
    );
}
