//! Post-back host allowlist.
//!
//! Loaded from `RELAY_ALLOWED_HOSTS`. When unset every host that passes the
//! scheme and shape checks is allowed. Patterns are either exact hosts
//! (`partner.example`) or suffix wildcards (`*.partner.example`).

/// Host allowlist supporting exact and `*.suffix` patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAllowlist {
    patterns: Vec<String>,
}

impl HostAllowlist {
    /// Parse a comma-separated pattern list.
    ///
    /// Returns `None` when the list is empty after trimming (allowlist disabled).
    pub fn parse(raw: &str) -> Option<Self> {
        let patterns: Vec<String> = raw
            .split(',')
            .map(Self::normalize_host)
            .filter(|s| !s.is_empty())
            .collect();

        if patterns.is_empty() {
            return None;
        }

        Some(Self { patterns })
    }

    pub fn is_allowed(&self, host: &str) -> bool {
        let host = Self::normalize_host(host);
        self.patterns
            .iter()
            .any(|pattern| Self::matches_pattern(&host, pattern))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Trim, lowercase and drop a trailing root dot.
    fn normalize_host(host: &str) -> String {
        host.trim().trim_end_matches('.').to_ascii_lowercase()
    }

    /// `*.example.com` matches strict subdomains only, never `example.com` itself.
    fn matches_pattern(host: &str, pattern: &str) -> bool {
        match pattern.strip_prefix("*.") {
            Some(suffix) => host
                .strip_suffix(suffix)
                .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.')),
            None => host == pattern,
        }
    }
}
