//! Member and invitation payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use sphere_core::{Invitation, Role, User};

#[derive(Debug, Deserialize, Validate)]
pub struct InviteUserRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for MemberDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationDto {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub invitation_code: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Invitation> for InvitationDto {
    fn from(invitation: Invitation) -> Self {
        Self {
            id: invitation.id,
            email: invitation.email,
            role: invitation.role,
            invitation_code: invitation.invitation_code,
            expires_at: invitation.expires_at,
        }
    }
}
