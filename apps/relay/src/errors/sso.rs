//! Tagged failure types for the SSO flow.
//!
//! These are HTTP-agnostic. `Display` strings are safe to show to callers:
//! they never contain the secret, signature bytes, the derived key or the raw
//! token. Diagnostic context for logs lives in separate fields.

use actix_web::http::StatusCode;
use thiserror::Error;

use super::error_code::ErrorCode;

/// Token validation failures. All of them are terminal for the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No token was supplied")]
    MissingToken,
    /// `reason` is the decoder's classification, kept for logs.
    #[error("Token could not be decoded")]
    MalformedToken { reason: String },
    #[error("Token signature is invalid")]
    SignatureInvalid,
    /// `claim` is one of `iss`, `aud`, `exp`, `nbf`.
    #[error("Token claim `{claim}` was not accepted")]
    ClaimMismatch { claim: &'static str },
    #[error("Token is missing required claim `{0}`")]
    MissingRequiredClaim(&'static str),
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingToken => ErrorCode::MissingToken,
            Self::MalformedToken { .. } => ErrorCode::MalformedToken,
            Self::SignatureInvalid => ErrorCode::SignatureInvalid,
            Self::ClaimMismatch { .. } => ErrorCode::ClaimMismatch,
            Self::MissingRequiredClaim(_) => ErrorCode::MissingRequiredClaim,
        }
    }
}

/// Failures of the outbound post-back, or refusal to attempt it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// `reason` describes which destination rule failed; it never includes the URL.
    #[error("Post-back destination is not trusted: {reason}")]
    UntrustedDestination { reason: String },
    #[error("Post-back endpoint did not respond in time")]
    Timeout,
    #[error("Post-back endpoint could not be reached")]
    ConnectionFailure { reason: String },
    #[error("Post-back endpoint responded with status {status}")]
    NonSuccessStatus { status: u16 },
    #[error("Post-back response could not be parsed")]
    ResponseParseFailure { reason: String },
}

impl RelayError {
    pub fn untrusted(reason: impl Into<String>) -> Self {
        Self::UntrustedDestination {
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UntrustedDestination { .. } => ErrorCode::UntrustedDestination,
            Self::Timeout => ErrorCode::RelayTimeout,
            Self::ConnectionFailure { .. } => ErrorCode::RelayConnectionFailure,
            Self::NonSuccessStatus { .. } => ErrorCode::RelayNonSuccessStatus,
            Self::ResponseParseFailure { .. } => ErrorCode::RelayResponseParseFailure,
        }
    }
}

/// Outcome of a failed SSO request, tagged by the stage that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SsoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Relay(#[from] RelayError),
}

impl SsoError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(e) => e.code(),
            Self::Relay(e) => e.code(),
        }
    }

    /// Authentication-class failures map to 403; downstream failures do not,
    /// since the caller already proved their identity.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::FORBIDDEN,
            Self::Relay(RelayError::UntrustedDestination { .. }) => StatusCode::FORBIDDEN,
            Self::Relay(RelayError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Self::Relay(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Every 403 carries the re-authentication hint; downstream failures do not.
    pub fn suggests_reauth(&self) -> bool {
        self.status() == StatusCode::FORBIDDEN
    }

    /// Diagnostic reason for logs, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Validation(ValidationError::MalformedToken { reason })
            | Self::Relay(RelayError::UntrustedDestination { reason })
            | Self::Relay(RelayError::ConnectionFailure { reason })
            | Self::Relay(RelayError::ResponseParseFailure { reason }) => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_are_forbidden() {
        let cases = [
            ValidationError::MissingToken,
            ValidationError::MalformedToken {
                reason: "base64".into(),
            },
            ValidationError::SignatureInvalid,
            ValidationError::ClaimMismatch { claim: "iss" },
            ValidationError::MissingRequiredClaim("post_url"),
        ];
        for case in cases {
            let err = SsoError::from(case);
            assert_eq!(err.status(), StatusCode::FORBIDDEN);
            assert!(err.suggests_reauth());
        }
    }

    #[test]
    fn relay_failures_are_distinct_from_auth_failures() {
        assert_eq!(
            SsoError::from(RelayError::Timeout).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            SsoError::from(RelayError::NonSuccessStatus { status: 500 }).status(),
            StatusCode::BAD_GATEWAY
        );
        assert!(!SsoError::from(RelayError::ConnectionFailure {
            reason: "refused".into()
        })
        .suggests_reauth());
    }

    #[test]
    fn untrusted_destination_is_rejected_as_forbidden() {
        let err = SsoError::from(RelayError::untrusted("scheme not allowed"));
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.code(), ErrorCode::UntrustedDestination);
        assert_eq!(err.reason(), Some("scheme not allowed"));
        assert!(err.suggests_reauth());
    }

    #[test]
    fn display_is_generic() {
        let err = SsoError::from(ValidationError::MalformedToken {
            reason: "InvalidToken".into(),
        });
        assert_eq!(err.to_string(), "Token could not be decoded");
    }
}
