pub mod claims;
pub mod jwt;

pub use claims::{Audience, SsoClaims};
pub use jwt::validate_token;
