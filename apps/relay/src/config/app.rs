//! Centralized application configuration loaded from environment variables.
//!
//! Everything the relay needs is read once at startup into a `Config`; request
//! handling never touches the process environment.

use std::fmt;
use std::time::Duration;

use crate::config::host_allowlist::HostAllowlist;
use crate::error::AppError;

pub const DEFAULT_TOKEN_PARAM: &str = "token";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_RELAY_TIMEOUT_MS: u64 = 5_000;
pub const MAX_RELAY_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Default outbound `User-Agent`.
pub fn default_user_agent() -> String {
    format!("sso-relay/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Clone)]
pub struct Config {
    // Server configuration
    pub host: String,
    pub port: u16,

    // Token validation
    pub secret: Vec<u8>,
    pub issuer: String,
    pub audience: String,
    pub leeway_secs: u64,

    // Inbound surface
    pub token_param: String,
    pub sso_path: String,

    // Outbound relay
    pub relay_timeout: Duration,
    pub allow_http: bool,
    pub allowed_hosts: Option<HostAllowlist>,
    pub user_agent: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .field("token_param", &self.token_param)
            .field("sso_path", &self.sso_path)
            .field("relay_timeout", &self.relay_timeout)
            .field("allow_http", &self.allow_http)
            .field("allowed_hosts", &self.allowed_hosts)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Config {
    /// Load and validate all configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            optional(key).ok_or_else(|| AppError::config(format!("{key} must be set")))
        };

        // Not trimmed: the secret is used byte-for-byte.
        let secret = lookup("SECRET_KEY")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::config("SECRET_KEY must be set"))?
            .into_bytes();
        let issuer = required("ISSUER_DOMAIN")?;
        let audience = required("AUDIENCE_DOMAIN")?;

        let host = optional("RELAY_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or("RELAY_PORT", optional("RELAY_PORT"), DEFAULT_PORT)?;

        let timeout_ms = parse_or(
            "RELAY_TIMEOUT_MS",
            optional("RELAY_TIMEOUT_MS"),
            DEFAULT_RELAY_TIMEOUT_MS,
        )?;
        if timeout_ms == 0 || timeout_ms > MAX_RELAY_TIMEOUT_MS {
            return Err(AppError::config(format!(
                "RELAY_TIMEOUT_MS must be between 1 and {MAX_RELAY_TIMEOUT_MS}, got {timeout_ms}"
            )));
        }

        let leeway_secs = parse_or(
            "JWT_LEEWAY_SECS",
            optional("JWT_LEEWAY_SECS"),
            DEFAULT_LEEWAY_SECS,
        )?;

        let allow_http = match optional("RELAY_ALLOW_HTTP") {
            None => false,
            Some(v) => parse_bool("RELAY_ALLOW_HTTP", &v)?,
        };

        Ok(Self {
            host,
            port,
            secret,
            issuer,
            audience,
            leeway_secs,
            token_param: optional("TOKEN_NAME").unwrap_or_else(|| DEFAULT_TOKEN_PARAM.to_string()),
            sso_path: optional("SSO_PATH").unwrap_or_default(),
            relay_timeout: Duration::from_millis(timeout_ms),
            allow_http,
            allowed_hosts: optional("RELAY_ALLOWED_HOSTS").and_then(|v| HostAllowlist::parse(&v)),
            user_agent: optional("RELAY_USER_AGENT").unwrap_or_else(default_user_agent),
        })
    }

    /// Link shown on authentication failures: issuer followed by the SSO start path.
    pub fn sso_start_url(&self) -> String {
        format!("{}{}", self.issuer, self.sso_path)
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
{
    match raw {
        None => Ok(default),
        Some(v) => v
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{key} must be a valid number, got '{v}'"))),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, AppError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::config(format!(
            "{key} must be a boolean, got '{raw}'"
        ))),
    }
}
