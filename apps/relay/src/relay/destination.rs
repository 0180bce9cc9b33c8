//! Post-back destination policy.
//!
//! `post_url` arrives inside a signed token but is still untrusted data: a
//! compromised or careless issuer must not be able to point the relay at
//! arbitrary schemes or internal addresses. Every destination is checked here
//! before a request is built.

use std::net::IpAddr;

use url::{Host, Url};

use crate::config::HostAllowlist;
use crate::errors::RelayError;

/// Longest accepted destination URL.
pub const MAX_DESTINATION_LENGTH: usize = 2048;

#[derive(Debug, Clone, Default)]
pub struct DestinationPolicy {
    /// Development mode: permits `http` and private / loopback IP literals.
    pub allow_insecure: bool,
    /// When set, the destination host must match.
    pub allowed_hosts: Option<HostAllowlist>,
}

impl DestinationPolicy {
    pub fn new(allow_insecure: bool, allowed_hosts: Option<HostAllowlist>) -> Self {
        Self {
            allow_insecure,
            allowed_hosts,
        }
    }

    /// Parse and vet a destination. The error reason never echoes the URL.
    pub fn check(&self, raw: &str) -> Result<Url, RelayError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(RelayError::untrusted("destination is empty"));
        }
        if raw.len() > MAX_DESTINATION_LENGTH {
            return Err(RelayError::untrusted(format!(
                "destination exceeds {MAX_DESTINATION_LENGTH} characters"
            )));
        }

        let url = Url::parse(raw)
            .map_err(|_| RelayError::untrusted("destination is not an absolute URL"))?;

        match url.scheme() {
            "https" => {}
            "http" if self.allow_insecure => {}
            "http" => return Err(RelayError::untrusted("plain http is not allowed")),
            other => {
                return Err(RelayError::untrusted(format!(
                    "scheme `{other}` is not allowed"
                )))
            }
        }

        if !url.username().is_empty() || url.password().is_some() {
            return Err(RelayError::untrusted("embedded credentials are not allowed"));
        }

        let host = url
            .host()
            .ok_or_else(|| RelayError::untrusted("destination has no host"))?;

        if !self.allow_insecure {
            let internal = match ip_literal(&host) {
                Some(ip) => is_internal(ip),
                None => is_loopback_name(url.host_str().unwrap_or_default()),
            };
            if internal {
                return Err(RelayError::untrusted(
                    "internal network addresses are not allowed",
                ));
            }
        }

        if let Some(allowlist) = &self.allowed_hosts {
            let host_str = url.host_str().unwrap_or_default();
            if !allowlist.is_allowed(host_str) {
                return Err(RelayError::untrusted("host is not on the allowlist"));
            }
        }

        Ok(url)
    }
}

fn ip_literal(host: &Host<&str>) -> Option<IpAddr> {
    match host {
        Host::Ipv4(v4) => Some(IpAddr::V4(*v4)),
        Host::Ipv6(v6) => Some(IpAddr::V6(*v6)),
        Host::Domain(_) => None,
    }
}

/// `localhost` and anything under `.localhost` (RFC 6761).
fn is_loopback_name(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == "localhost" || host.ends_with(".localhost")
}

fn is_internal(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || v6.to_ipv4_mapped().is_some_and(|v4| is_internal(IpAddr::V4(v4)))
                // fc00::/7 unique local, fe80::/10 link local
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}
