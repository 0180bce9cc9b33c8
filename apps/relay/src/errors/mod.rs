//! Error handling for the SSO relay.

pub mod error_code;
pub mod sso;

pub use error_code::ErrorCode;
pub use sso::{RelayError, SsoError, ValidationError};
