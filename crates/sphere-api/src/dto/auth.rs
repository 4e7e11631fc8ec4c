//! Authentication payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use sphere_core::services::AuthSession;
use sphere_core::Role;

use super::{validate_business_name, validate_not_blank, validate_password, validate_username};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub password: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub business_code: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessRequest {
    #[validate(custom(function = "validate_business_name"))]
    pub business_name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[validate(custom(function = "validate_username"))]
    pub username: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvitationSignupRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub business_code: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub invitation_code: String,
}

/// Token plus the identity the browser keeps in local storage.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: SessionUserDto,
    pub business: SessionBusinessDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserDto {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub business_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBusinessDto {
    pub id: Uuid,
    pub name: String,
    pub business_code: String,
    pub created_at: DateTime<Utc>,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token,
            user: SessionUserDto {
                id: session.user.id,
                email: session.user.email,
                username: session.user.username,
                business_id: session.user.business_id,
                role: session.user.role,
            },
            business: SessionBusinessDto {
                id: session.business.id,
                name: session.business.name,
                business_code: session.business.business_code,
                created_at: session.business.created_at,
            },
        }
    }
}
