//! Outbound post-back relay.

pub mod client;
pub mod destination;
pub mod key;

pub use client::{RelayClient, RelayReport, RelayRequest, RelayResponse};
pub use destination::DestinationPolicy;
pub use key::{derive_key, DerivedKey};
