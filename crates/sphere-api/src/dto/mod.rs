//! Request and response bodies

pub mod auth;
pub mod business;
pub mod user;

pub use auth::*;
pub use business::*;
pub use user::*;

use serde::Serialize;
use validator::ValidationError;

use sphere_security::PasswordService;
use sphere_shared::constants::{MAX_BUSINESS_NAME_LENGTH, MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH};

/// Plain acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
    let length = username.trim().chars().count() as u64;
    if (MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(ValidationError::new("username_length"))
    }
}

pub(crate) fn validate_business_name(name: &str) -> Result<(), ValidationError> {
    let length = name.trim().chars().count() as u64;
    if (1..=MAX_BUSINESS_NAME_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(ValidationError::new("business_name_length"))
    }
}

pub(crate) fn validate_password(password: &str) -> Result<(), ValidationError> {
    PasswordService::check_policy(password).map_err(|_| ValidationError::new("password_policy"))
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_bounds_ignore_padding() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username("  ab  ").is_err());
        assert!(validate_username(&"x".repeat(50)).is_ok());
        assert!(validate_username(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_business_name_bounds() {
        assert!(validate_business_name("S").is_ok());
        assert!(validate_business_name("   ").is_err());
        assert!(validate_business_name(&"x".repeat(101)).is_err());
    }
}
