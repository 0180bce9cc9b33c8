//! Signed SSO token fixtures.
//!
//! Token issuance belongs to the identity provider, so this builder only exists
//! for tests. It produces HS256 tokens by default and lets a test drop, replace
//! or corrupt any claim.
//!
//! ```rust,no_run
//! use relay_test_support::TokenBuilder;
//!
//! let token = TokenBuilder::new("secret")
//!     .standard_valid_claims("idp.example", "app.example")
//!     .post_url("https://partner.example/sso")
//!     .sign();
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

/// Current Unix timestamp in seconds.
pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Fluent builder for HMAC-signed test tokens.
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    secret: Vec<u8>,
    algorithm: Algorithm,
    claims: Value,
}

impl TokenBuilder {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            algorithm: Algorithm::HS256,
            claims: json!({}),
        }
    }

    /// Sign with a different HMAC algorithm (HS384/HS512).
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn issuer(self, iss: impl Into<String>) -> Self {
        self.claim("iss", json!(iss.into()))
    }

    pub fn audience(self, aud: impl Into<String>) -> Self {
        self.claim("aud", json!(aud.into()))
    }

    pub fn audiences<I, S>(self, auds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list: Vec<String> = auds.into_iter().map(Into::into).collect();
        self.claim("aud", json!(list))
    }

    pub fn user_id(self, uid: impl Into<String>) -> Self {
        self.claim("uid", json!(uid.into()))
    }

    pub fn host_id(self, hid: impl Into<String>) -> Self {
        self.claim("hid", json!(hid.into()))
    }

    pub fn post_url(self, url: impl Into<String>) -> Self {
        self.claim("post_url", json!(url.into()))
    }

    pub fn issued_at(self, iat: u64) -> Self {
        self.claim("iat", json!(iat))
    }

    pub fn expiration(self, exp: u64) -> Self {
        self.claim("exp", json!(exp))
    }

    pub fn not_before(self, nbf: u64) -> Self {
        self.claim("nbf", json!(nbf))
    }

    /// Set an arbitrary claim.
    pub fn claim(mut self, name: &str, value: Value) -> Self {
        self.claims[name] = value;
        self
    }

    /// Remove a claim previously set.
    pub fn without(mut self, name: &str) -> Self {
        if let Some(map) = self.claims.as_object_mut() {
            map.remove(name);
        }
        self
    }

    /// Issuer, audience, ids and a one-hour validity window.
    pub fn standard_valid_claims(self, issuer: &str, audience: &str) -> Self {
        let now = now();
        self.issuer(issuer)
            .audience(audience)
            .user_id("user-42")
            .host_id("tenant-7")
            .issued_at(now - 10)
            .expiration(now + 3600)
    }

    /// Encode and sign the token.
    ///
    /// Panics on encoding failure; fixtures are always encodable.
    pub fn sign(&self) -> String {
        encode(
            &Header::new(self.algorithm),
            &self.claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .expect("test token must encode")
    }
}

/// Change one character in the middle of the signature segment.
///
/// The last base64url character of an HMAC signature carries padding bits, so
/// touching it can yield a non-canonical encoding instead of a wrong signature.
pub fn corrupt_signature(token: &str) -> String {
    let sig_start = token.rfind('.').map(|i| i + 1).unwrap_or(0);
    let target = sig_start + 4;
    token
        .char_indices()
        .map(|(i, c)| match (i == target, c) {
            (true, 'A') => 'B',
            (true, _) => 'A',
            (false, c) => c,
        })
        .collect()
}
