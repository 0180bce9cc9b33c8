use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::auth::claims::{RawClaims, SsoClaims};
use crate::errors::ValidationError;
use crate::state::security_config::SecurityConfig;

/// Verify an SSO token and extract its claims.
///
/// Checks, in order: structure, signature under the configured algorithm,
/// issuer, audience, `exp`/`nbf` (when present), then the application claims
/// `uid`, `hid` and `post_url`.
///
/// Errors:
/// - Empty token → `MissingToken`
/// - Undecodable token → `MalformedToken`
/// - Bad signature, or header naming another algorithm → `SignatureInvalid`
/// - Wrong/missing `iss` or `aud`, expired, not yet valid → `ClaimMismatch`
/// - Missing application claim → `MissingRequiredClaim`
pub fn validate_token(token: &str, security: &SecurityConfig) -> Result<SsoClaims, ValidationError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ValidationError::MissingToken);
    }

    decode::<RawClaims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation_for(security),
    )
    .map_err(|e| classify(e.kind()))
    .and_then(|data| SsoClaims::try_from(data.claims))
}

/// Pin the algorithm to the configured one; issuer and audience are required
/// claims, expiry is checked only when present.
fn validation_for(security: &SecurityConfig) -> Validation {
    let mut validation = Validation::new(security.algorithm);
    validation.set_issuer(&[security.issuer.as_str()]);
    validation.set_audience(&[security.audience.as_str()]);
    validation.set_required_spec_claims(&["iss", "aud"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = security.leeway_secs;
    validation
}

fn classify(kind: &ErrorKind) -> ValidationError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            ValidationError::SignatureInvalid
        }
        ErrorKind::InvalidIssuer => ValidationError::ClaimMismatch { claim: "iss" },
        ErrorKind::InvalidAudience => ValidationError::ClaimMismatch { claim: "aud" },
        ErrorKind::ExpiredSignature => ValidationError::ClaimMismatch { claim: "exp" },
        ErrorKind::ImmatureSignature => ValidationError::ClaimMismatch { claim: "nbf" },
        ErrorKind::MissingRequiredClaim(name) => ValidationError::ClaimMismatch {
            claim: required_claim_name(name),
        },
        other => ValidationError::MalformedToken {
            reason: malformed_reason(other).to_string(),
        },
    }
}

/// Only `iss` and `aud` are required by `validation_for`.
fn required_claim_name(name: &str) -> &'static str {
    match name {
        "iss" => "iss",
        "aud" => "aud",
        _ => "unknown",
    }
}

/// Short classification only; decoder messages can quote token contents.
fn malformed_reason(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidToken => "invalid_structure",
        ErrorKind::Base64(_) => "invalid_base64",
        ErrorKind::Json(_) => "invalid_json",
        ErrorKind::Utf8(_) => "invalid_utf8",
        ErrorKind::MissingAlgorithm => "missing_algorithm",
        _ => "undecodable",
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::Algorithm;
    use relay_test_support::tokens::corrupt_signature;
    use relay_test_support::{now, TokenBuilder};

    use super::validate_token;
    use crate::errors::ValidationError;
    use crate::state::security_config::SecurityConfig;

    const SECRET: &str = "test_secret_key_for_testing_purposes_only";
    const ISSUER: &str = "idp.example";
    const AUDIENCE: &str = "app.example";

    fn security() -> SecurityConfig {
        SecurityConfig::new(SECRET.as_bytes(), ISSUER, AUDIENCE).with_leeway(0)
    }

    fn valid() -> TokenBuilder {
        TokenBuilder::new(SECRET)
            .standard_valid_claims(ISSUER, AUDIENCE)
            .post_url("https://partner.example/sso")
    }

    #[test]
    fn test_valid_token() {
        let claims = validate_token(&valid().sign(), &security()).unwrap();

        assert_eq!(claims.user_id(), "user-42");
        assert_eq!(claims.host_id(), "tenant-7");
        assert_eq!(claims.post_url(), "https://partner.example/sso");
        assert_eq!(claims.issuer(), ISSUER);
        assert!(claims.expires_at().is_some());
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(
            validate_token("", &security()),
            Err(ValidationError::MissingToken)
        );
        assert_eq!(
            validate_token("   ", &security()),
            Err(ValidationError::MissingToken)
        );
    }

    #[test]
    fn test_malformed_token() {
        for garbage in ["not-a-jwt", "a.b", "a.b.c", "%%%.%%%.%%%"] {
            match validate_token(garbage, &security()) {
                Err(ValidationError::MalformedToken { .. }) => {}
                other => panic!("expected MalformedToken for {garbage:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_bad_signature() {
        let token = TokenBuilder::new("secret-B")
            .standard_valid_claims(ISSUER, AUDIENCE)
            .post_url("https://partner.example/sso")
            .sign();

        assert_eq!(
            validate_token(&token, &security()),
            Err(ValidationError::SignatureInvalid)
        );
    }

    #[test]
    fn test_corrupted_signature() {
        let token = corrupt_signature(&valid().sign());
        assert_eq!(
            validate_token(&token, &security()),
            Err(ValidationError::SignatureInvalid)
        );
    }

    #[test]
    fn test_algorithm_is_pinned() {
        let token = valid().algorithm(Algorithm::HS512).sign();
        assert_eq!(
            validate_token(&token, &security()),
            Err(ValidationError::SignatureInvalid)
        );
    }

    #[test]
    fn test_wrong_issuer() {
        let token = valid().issuer("evil.example").sign();
        assert_eq!(
            validate_token(&token, &security()),
            Err(ValidationError::ClaimMismatch { claim: "iss" })
        );
    }

    #[test]
    fn test_missing_issuer() {
        let token = valid().without("iss").sign();
        assert_eq!(
            validate_token(&token, &security()),
            Err(ValidationError::ClaimMismatch { claim: "iss" })
        );
    }

    #[test]
    fn test_missing_audience() {
        let token = valid().without("aud").sign();
        assert_eq!(
            validate_token(&token, &security()),
            Err(ValidationError::ClaimMismatch { claim: "aud" })
        );
    }

    #[test]
    fn test_wrong_audience() {
        let token = valid().audience("other.example").sign();
        assert_eq!(
            validate_token(&token, &security()),
            Err(ValidationError::ClaimMismatch { claim: "aud" })
        );
    }

    #[test]
    fn test_audience_set_membership() {
        let token = valid().audiences(["other.example", AUDIENCE]).sign();
        let claims = validate_token(&token, &security()).unwrap();
        assert_eq!(claims.audience().len(), 2);
    }

    #[test]
    fn test_expired_token() {
        let now = now();
        let token = valid().issued_at(now - 7200).expiration(now - 3600).sign();
        assert_eq!(
            validate_token(&token, &security()),
            Err(ValidationError::ClaimMismatch { claim: "exp" })
        );
    }

    #[test]
    fn test_not_yet_valid() {
        let token = valid().not_before(now() + 3600).sign();
        assert_eq!(
            validate_token(&token, &security()),
            Err(ValidationError::ClaimMismatch { claim: "nbf" })
        );
    }

    #[test]
    fn test_temporal_claims_carried_through() {
        let now = now();
        let token = valid().issued_at(now - 60).not_before(now - 30).sign();
        let claims = validate_token(&token, &security()).unwrap();
        assert_eq!(claims.issued_at(), Some(now - 60));
        assert_eq!(claims.not_before(), Some(now - 30));
    }

    #[test]
    fn test_expiry_is_optional() {
        let token = valid().without("exp").sign();
        assert!(validate_token(&token, &security()).is_ok());
    }

    #[test]
    fn test_leeway_tolerates_small_skew() {
        let token = valid().expiration(now() - 5).sign();
        let lenient = security().with_leeway(60);
        assert!(validate_token(&token, &lenient).is_ok());
    }

    #[test]
    fn test_missing_post_url() {
        let token = TokenBuilder::new(SECRET)
            .standard_valid_claims(ISSUER, AUDIENCE)
            .sign();
        assert_eq!(
            validate_token(&token, &security()),
            Err(ValidationError::MissingRequiredClaim("post_url"))
        );
    }

    #[test]
    fn test_error_display_never_contains_secret() {
        let token = TokenBuilder::new("secret-B")
            .standard_valid_claims(ISSUER, AUDIENCE)
            .sign();
        let err = validate_token(&token, &security()).unwrap_err();
        assert!(!err.to_string().contains(SECRET));
        assert!(!format!("{err:?}").contains(SECRET));
    }
}
