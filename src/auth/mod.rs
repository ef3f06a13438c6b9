mod helpers;
mod middleware;
mod token;

pub use helpers::{TokenValidationError, extract_token_from_header, issue_admin_token, validate_token};
pub use middleware::{AuthError, RequireAdmin};
pub use token::{TokenGenerator, parse_token};
