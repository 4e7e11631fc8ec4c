//! Request middleware

pub mod auth;
pub mod rate_limit;

pub use auth::{authenticate, require_admin, require_manager};
pub use rate_limit::{rate_limit, AuthRateLimiter};
