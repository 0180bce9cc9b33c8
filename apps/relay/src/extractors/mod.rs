pub mod response_format;
pub mod sso_token;

pub use response_format::ResponseFormat;
pub use sso_token::SsoToken;
