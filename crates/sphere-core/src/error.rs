//! Domain errors

use sphere_security::PasswordError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown business code")]
    UnknownBusinessCode,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Business code is not valid for sign-up")]
    InvalidSignupBusinessCode,

    #[error("Invitation is invalid or expired")]
    InvitationInvalid,

    #[error("Email does not match the invitation")]
    InvitationEmailMismatch,

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Business not found")]
    BusinessNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("The business owner's role cannot be changed")]
    OwnerRoleImmutable,

    #[error("Users cannot remove themselves")]
    CannotRemoveSelf,

    #[error("The business owner cannot be removed")]
    CannotRemoveOwner,

    #[error("Password too short")]
    PasswordTooShort,

    #[error("Password too long")]
    PasswordTooLong,

    #[error("Password too weak")]
    PasswordTooWeak,

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Unable to generate unique code")]
    UnableToGenerateUniqueCode,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<PasswordError> for DomainError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort => DomainError::PasswordTooShort,
            PasswordError::TooLong => DomainError::PasswordTooLong,
            PasswordError::TooWeak => DomainError::PasswordTooWeak,
            PasswordError::HashError(msg) => DomainError::PasswordHashError(msg),
        }
    }
}
