pub mod sso;

pub use sso::{authenticate_and_relay, SsoStage};
