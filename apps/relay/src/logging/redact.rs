use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Registry of the redaction patterns, one allow per construction site.
pub struct SecretPatterns;

impl SecretPatterns {
    /// Compact JWS: three base64url segments separated by dots.
    /// SAFETY: This regex pattern is a vetted literal that compiles successfully
    pub fn compact_jwt() -> &'static Regex {
        static JWT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]*").unwrap()
        });
        &JWT_REGEX
    }

    /// Hex digests (≥32 chars), e.g. a derived key.
    /// SAFETY: This regex pattern is a vetted literal that compiles successfully
    pub fn hex_digest() -> &'static Regex {
        static HEX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Fa-f0-9]{32,}\b").unwrap()
        });
        &HEX_REGEX
    }
}

/// Masks tokens and digests in free-form text.
///
/// JWTs keep their first eight characters so log lines can still be
/// correlated by a human; hex digests are replaced entirely.
pub fn redact(input: &str) -> String {
    let jwt_redacted = SecretPatterns::compact_jwt().replace_all(input, |caps: &regex::Captures| {
        let full = &caps[0];
        format!("{}…[REDACTED_JWT]", &full[..8])
    });

    SecretPatterns::hex_digest()
        .replace_all(&jwt_redacted, "[REDACTED_DIGEST]")
        .to_string()
}

/// Display wrapper that applies [`redact`] when formatted.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
