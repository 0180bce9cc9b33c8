//! Relay test support utilities
//!
//! Shared helpers for the relay's unit and integration tests: unified logging
//! initialization, signed SSO token fixtures, and a stub post-back partner.

pub mod logging;
pub mod partner;
pub mod tokens;

pub use partner::{PartnerBehavior, RecordedRequest, StubPartner};
pub use tokens::{corrupt_signature, now, TokenBuilder};
