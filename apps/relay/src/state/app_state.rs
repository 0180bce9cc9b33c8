use crate::config::Config;
use crate::error::AppError;
use crate::relay::RelayClient;

use super::security_config::SecurityConfig;

/// Process-wide, read-only state shared by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Token validation settings
    pub security: SecurityConfig,
    /// Outbound post-back client
    pub relay: RelayClient,
    /// Query parameter carrying the token
    pub token_param: String,
    /// Re-authentication link shown on authentication failures
    pub sso_start_url: String,
}

impl AppState {
    pub fn new(
        security: SecurityConfig,
        relay: RelayClient,
        token_param: impl Into<String>,
        sso_start_url: impl Into<String>,
    ) -> Self {
        Self {
            security,
            relay,
            token_param: token_param.into(),
            sso_start_url: sso_start_url.into(),
        }
    }

    /// Build state once at startup.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let relay = RelayClient::from_config(config)
            .map_err(|e| AppError::internal(format!("failed to build relay client: {e}")))?;

        Ok(Self::new(
            SecurityConfig::from_config(config),
            relay,
            config.token_param.clone(),
            config.sso_start_url(),
        ))
    }

    /// Hint link, omitted when neither issuer nor path yields anything useful.
    pub fn sso_hint(&self) -> Option<String> {
        Some(self.sso_start_url.clone()).filter(|s| !s.is_empty())
    }
}
