//! Error codes for the SSO relay.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that appear
//! in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Token validation
    /// No token supplied
    MissingToken,
    /// Token could not be decoded
    MalformedToken,
    /// Signature did not verify under the pinned algorithm
    SignatureInvalid,
    /// Issuer, audience or validity window check failed
    ClaimMismatch,
    /// uid, hid or post_url absent
    MissingRequiredClaim,

    // Relay
    /// post_url failed destination validation
    UntrustedDestination,
    /// Post-back endpoint did not answer in time
    RelayTimeout,
    /// Post-back endpoint unreachable
    RelayConnectionFailure,
    /// Post-back endpoint answered with a non-2xx status
    RelayNonSuccessStatus,
    /// Post-back response body could not be parsed
    RelayResponseParseFailure,

    // System
    /// Resource not found
    NotFound,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingToken => "MISSING_TOKEN",
            Self::MalformedToken => "MALFORMED_TOKEN",
            Self::SignatureInvalid => "SIGNATURE_INVALID",
            Self::ClaimMismatch => "CLAIM_MISMATCH",
            Self::MissingRequiredClaim => "MISSING_REQUIRED_CLAIM",

            Self::UntrustedDestination => "UNTRUSTED_DESTINATION",
            Self::RelayTimeout => "RELAY_TIMEOUT",
            Self::RelayConnectionFailure => "RELAY_CONNECTION_FAILURE",
            Self::RelayNonSuccessStatus => "RELAY_NON_SUCCESS_STATUS",
            Self::RelayResponseParseFailure => "RELAY_RESPONSE_PARSE_FAILURE",

            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    pub const ALL: [ErrorCode; 13] = [
        Self::MissingToken,
        Self::MalformedToken,
        Self::SignatureInvalid,
        Self::ClaimMismatch,
        Self::MissingRequiredClaim,
        Self::UntrustedDestination,
        Self::RelayTimeout,
        Self::RelayConnectionFailure,
        Self::RelayNonSuccessStatus,
        Self::RelayResponseParseFailure,
        Self::NotFound,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::MissingToken.as_str(), "MISSING_TOKEN");
        assert_eq!(ErrorCode::SignatureInvalid.as_str(), "SIGNATURE_INVALID");
        assert_eq!(ErrorCode::ClaimMismatch.as_str(), "CLAIM_MISMATCH");
        assert_eq!(
            ErrorCode::UntrustedDestination.as_str(),
            "UNTRUSTED_DESTINATION"
        );
        assert_eq!(ErrorCode::RelayTimeout.as_str(), "RELAY_TIMEOUT");
        assert_eq!(ErrorCode::ConfigError.as_str(), "CONFIG_ERROR");
    }

    #[test]
    fn test_error_codes_unique_and_screaming_snake() {
        let mut seen = HashSet::new();
        for code in ErrorCode::ALL {
            let s = code.as_str();
            assert!(seen.insert(s), "duplicate code {s}");
            assert!(
                s.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
                "{s} is not SCREAMING_SNAKE_CASE"
            );
        }
    }
}
