//! Authenticated caller identity

use uuid::Uuid;

use super::Role;

/// Identity decoded from a session token and attached to the request.
///
/// The role is the one captured when the token was issued; operations that
/// need an up-to-date role re-read the stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub email: String,
    pub business_id: Uuid,
    pub role: Role,
}
