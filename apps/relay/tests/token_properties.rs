//! Property tests for the token gate: whatever else is right about a token, a
//! wrong secret, issuer or audience never gets through.

mod common;

use common::{AUDIENCE, ISSUER, SECRET};
use proptest::prelude::*;
use relay_test_support::TokenBuilder;
use sso_relay::errors::ValidationError;
use sso_relay::{validate_token, SecurityConfig};

fn security() -> SecurityConfig {
    SecurityConfig::new(SECRET, ISSUER, AUDIENCE)
}

fn token(secret: &str, iss: &str, aud: &str) -> String {
    TokenBuilder::new(secret)
        .standard_valid_claims(iss, aud)
        .post_url("https://partner.example/sso")
        .sign()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_other_secret_fails_signature(secret in "[ -~]{1,64}") {
        prop_assume!(secret != SECRET);
        let result = validate_token(&token(&secret, ISSUER, AUDIENCE), &security());
        prop_assert_eq!(result.unwrap_err(), ValidationError::SignatureInvalid);
    }

    #[test]
    fn any_other_issuer_is_a_claim_mismatch(iss in "[a-z0-9:/.-]{1,40}") {
        prop_assume!(iss != ISSUER);
        let result = validate_token(&token(SECRET, &iss, AUDIENCE), &security());
        prop_assert_eq!(result.unwrap_err(), ValidationError::ClaimMismatch { claim: "iss" });
    }

    #[test]
    fn any_other_audience_is_a_claim_mismatch(aud in "[a-z0-9.-]{1,40}") {
        prop_assume!(aud != AUDIENCE);
        let result = validate_token(&token(SECRET, ISSUER, &aud), &security());
        prop_assert_eq!(result.unwrap_err(), ValidationError::ClaimMismatch { claim: "aud" });
    }

    #[test]
    fn arbitrary_strings_never_validate(raw in ".{0,200}") {
        prop_assert!(validate_token(&raw, &security()).is_err());
    }
}

#[test]
fn correct_token_validates() {
    let claims = validate_token(&token(SECRET, ISSUER, AUDIENCE), &security())
        .expect("token signed with the shared secret should validate");
    assert_eq!(claims.issuer(), ISSUER);
    assert_eq!(claims.user_id(), "user-42");
    assert_eq!(claims.post_url(), "https://partner.example/sso");
}
