// ============================================================================
// Sphere API - Member Handlers
// File: crates/sphere-api/src/handlers/users.rs
// ============================================================================

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use sphere_core::Actor;
use sphere_shared::i18n::{localize, MessageKey};
use uuid::Uuid;

use crate::dto::{InvitationDto, InviteUserRequest, MemberDto, MessageResponse, UpdateRoleRequest};
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// A malformed id cannot name any member.
fn parse_user_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(MessageKey::UserNotFound))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<MemberDto>>, ApiError> {
    let users = state.members.list(&actor).await?;
    Ok(Json(users.into_iter().map(MemberDto::from).collect()))
}

/// GET /api/users/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<InvitationDto>>, ApiError> {
    let invitations = state.members.list_pending_invitations(&actor).await?;
    Ok(Json(invitations.into_iter().map(InvitationDto::from).collect()))
}

/// POST /api/users/invite
pub async fn invite_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(payload): ValidatedJson<InviteUserRequest>,
) -> Result<(StatusCode, Json<InvitationDto>), ApiError> {
    let invitation = state
        .members
        .invite(&actor, &payload.email, payload.role)
        .await?;
    Ok((StatusCode::CREATED, Json(invitation.into())))
}

/// PUT /api/users/{user_id}/role
pub async fn update_role(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateRoleRequest>,
) -> Result<Json<MemberDto>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let user = state
        .members
        .update_role(&actor, &user_id, payload.role)
        .await?;
    Ok(Json(user.into()))
}

/// DELETE /api/users/{user_id}
pub async fn remove_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    state.members.remove(&actor, &user_id).await?;
    Ok(Json(MessageResponse {
        message: localize(MessageKey::UserRemoved).to_string(),
    }))
}
