use std::fmt;
use std::fmt::Write as _;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex length of a SHA-256 digest.
pub const DERIVED_KEY_LEN: usize = 64;

/// Correlation key sent alongside the token to the post-back endpoint.
///
/// `Debug` is redacted so the key cannot leak through `{:?}` in logs.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DerivedKey(String);

impl DerivedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// SHA-256 over `secret ‖ raw_token`, lowercase hex.
///
/// This encoding is a contract with post-back endpoints; changing it breaks
/// every partner that recomputes the key.
pub fn derive_key(secret: &[u8], raw_token: &str) -> DerivedKey {
    let digest = Sha256::new()
        .chain_update(secret)
        .chain_update(raw_token.as_bytes())
        .finalize();

    let mut hex = String::with_capacity(DERIVED_KEY_LEN);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    DerivedKey(hex)
}
