//! Password hashing with bcrypt and sign-up password policy

use sphere_shared::constants::{MAX_PASSWORD_BYTES, MIN_PASSWORD_LENGTH};
use thiserror::Error;

/// Characters accepted as the "special" class of the policy.
const SPECIAL_CHARS: &str = "@$!%*?&";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Password too short")]
    TooShort,
    #[error("Password too long")]
    TooLong,
    #[error("Password must mix upper case, lower case, digits and a special character")]
    TooWeak,
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    cost: u32,
}

impl PasswordService {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashError(e.to_string()))
    }

    /// Check `password` against a stored bcrypt hash.
    ///
    /// Hashes produced by other bcrypt implementations (`$2a$`, `$2b$`, `$2y$`)
    /// are accepted.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(password, hash).map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn check_policy(password: &str) -> Result<(), PasswordError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }

        let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_special = password.chars().any(|c| SPECIAL_CHARS.contains(c));

        if has_lower && has_upper && has_digit && has_special {
            Ok(())
        } else {
            Err(PasswordError::TooWeak)
        }
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(sphere_shared::constants::DEFAULT_BCRYPT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let service = PasswordService::new(4);
        let hash = service.hash("Secret1!x").unwrap();

        assert!(hash.starts_with("$2"));
        assert!(service.verify("Secret1!x", &hash).unwrap());
        assert!(!service.verify("secret1!x", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let service = PasswordService::new(4);
        assert!(matches!(
            service.verify("whatever", "plain-text"),
            Err(PasswordError::HashError(_))
        ));
    }

    #[test]
    fn test_policy() {
        assert_eq!(PasswordService::check_policy("Ab1!xyzw"), Ok(()));
        assert_eq!(PasswordService::check_policy("Ab1!xyz"), Err(PasswordError::TooShort));
        assert_eq!(PasswordService::check_policy("abcdefg1!"), Err(PasswordError::TooWeak));
        assert_eq!(PasswordService::check_policy("ABCDEFG1!"), Err(PasswordError::TooWeak));
        assert_eq!(PasswordService::check_policy("Abcdefgh!"), Err(PasswordError::TooWeak));
        assert_eq!(PasswordService::check_policy("Abcdefgh1"), Err(PasswordError::TooWeak));
        assert_eq!(
            PasswordService::check_policy(&format!("Ab1!{}", "x".repeat(200))),
            Err(PasswordError::TooLong)
        );
    }

    #[test]
    fn test_policy_stops_at_bcrypt_input_limit() {
        let at_limit = format!("Ab1!{}", "x".repeat(68));
        assert_eq!(at_limit.len(), 72);
        assert_eq!(PasswordService::check_policy(&at_limit), Ok(()));

        let past_limit = format!("{}y", at_limit);
        assert_eq!(PasswordService::check_policy(&past_limit), Err(PasswordError::TooLong));

        // Multi-byte characters count by their encoded size
        let wide = format!("Ab1!{}", "あ".repeat(23));
        assert_eq!(wide.chars().count(), 27);
        assert_eq!(PasswordService::check_policy(&wide), Err(PasswordError::TooLong));
    }
}
