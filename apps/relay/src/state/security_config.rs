use std::fmt;

use jsonwebtoken::Algorithm;

use crate::config::Config;

/// Token validation settings shared by every request.
#[derive(Clone)]
pub struct SecurityConfig {
    /// Shared HMAC secret for verifying tokens
    pub jwt_secret: Vec<u8>,
    /// Pinned algorithm; never taken from the token header
    pub algorithm: Algorithm,
    /// Trusted issuer (exact match)
    pub issuer: String,
    /// Trusted audience
    pub audience: String,
    /// Clock skew tolerated on `exp` / `nbf`, in seconds
    pub leeway_secs: u64,
}

impl SecurityConfig {
    /// Create a new SecurityConfig pinned to HS256.
    pub fn new(
        jwt_secret: impl Into<Vec<u8>>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            issuer: issuer.into(),
            audience: audience.into(),
            leeway_secs: crate::config::app::DEFAULT_LEEWAY_SECS,
        }
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.secret.clone(),
            config.issuer.clone(),
            config.audience.clone(),
        )
        .with_leeway(config.leeway_secs)
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}
