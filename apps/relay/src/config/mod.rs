pub mod app;
pub mod host_allowlist;

pub use app::Config;
pub use host_allowlist::HostAllowlist;
