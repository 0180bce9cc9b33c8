//! Claims carried by identity-provider SSO tokens.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// `aud` may be a single string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Audience::One(aud) => vec![aud],
            Audience::Many(auds) => auds,
        }
    }
}

/// Wire shape of the token payload. Everything is optional here so that a
/// missing application claim surfaces as `MissingRequiredClaim` rather than a
/// decoding failure.
#[derive(Debug, Deserialize)]
pub(crate) struct RawClaims {
    pub uid: Option<String>,
    pub hid: Option<String>,
    pub post_url: Option<String>,
    pub iss: Option<String>,
    pub aud: Option<Audience>,
    pub iat: Option<u64>,
    pub exp: Option<u64>,
    pub nbf: Option<u64>,
}

/// Verified claims of an SSO token. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SsoClaims {
    user_id: String,
    host_id: String,
    post_url: String,
    issuer: String,
    audience: Vec<String>,
    issued_at: Option<u64>,
    expires_at: Option<u64>,
    not_before: Option<u64>,
}

impl SsoClaims {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn host_id(&self) -> &str {
        &self.host_id
    }

    /// Untrusted until checked by the relay destination policy.
    pub fn post_url(&self) -> &str {
        &self.post_url
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &[String] {
        &self.audience
    }

    pub fn issued_at(&self) -> Option<u64> {
        self.issued_at
    }

    pub fn expires_at(&self) -> Option<u64> {
        self.expires_at
    }

    pub fn not_before(&self) -> Option<u64> {
        self.not_before
    }

    #[cfg(test)]
    pub(crate) fn for_tests(post_url: &str) -> Self {
        Self {
            user_id: "user-42".to_string(),
            host_id: "tenant-7".to_string(),
            post_url: post_url.to_string(),
            issuer: "idp.example".to_string(),
            audience: vec!["app.example".to_string()],
            issued_at: None,
            expires_at: None,
            not_before: None,
        }
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::MissingRequiredClaim(name))
}

impl TryFrom<RawClaims> for SsoClaims {
    type Error = ValidationError;

    /// Issuer and audience were already checked by the decoder; this step only
    /// insists on the application claims.
    fn try_from(raw: RawClaims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: required(raw.uid, "uid")?,
            host_id: required(raw.hid, "hid")?,
            post_url: required(raw.post_url, "post_url")?,
            issuer: raw.iss.unwrap_or_default(),
            audience: raw.aud.map(Audience::into_vec).unwrap_or_default(),
            issued_at: raw.iat,
            expires_at: raw.exp,
            not_before: raw.nbf,
        })
    }
}
