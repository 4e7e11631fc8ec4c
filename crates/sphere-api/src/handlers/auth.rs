// ============================================================================
// Sphere API - Auth Handlers
// File: crates/sphere-api/src/handlers/auth.rs
// ============================================================================
//! Authentication HTTP handlers (login, business creation, invitation sign-up)

use axum::{extract::State, http::StatusCode, Json};

use crate::dto::{AuthResponse, CreateBusinessRequest, InvitationSignupRequest, LoginRequest};
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// Login handler - POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let session = state
        .auth
        .login(&payload.email, &payload.password, &payload.business_code)
        .await?;
    Ok(Json(session.into()))
}

/// Business creation handler - POST /api/auth/business/create
pub async fn create_business(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBusinessRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let session = state
        .auth
        .create_business(
            &payload.business_name,
            &payload.email,
            &payload.password,
            &payload.username,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Invitation sign-up handler - POST /api/auth/signup/invitation
pub async fn signup_with_invitation(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<InvitationSignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let session = state
        .auth
        .signup_with_invitation(
            &payload.email,
            &payload.password,
            &payload.username,
            &payload.business_code,
            &payload.invitation_code,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}
