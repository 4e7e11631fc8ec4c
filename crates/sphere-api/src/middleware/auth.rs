//! Bearer-token authentication and role guards
//!
//! `authenticate` decodes the session token and stores the caller's
//! [`Actor`] in the request extensions. The guards read it back and must be
//! layered inside `authenticate`.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use sphere_core::{Actor, Role};
use sphere_shared::i18n::MessageKey;

use crate::error::ApiError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match header.and_then(|h| h.strip_prefix(BEARER_PREFIX)) {
        Some(rest) => rest.trim(),
        None => return Err(ApiError::Unauthorized(MessageKey::AuthRequired)),
    };
    if token.is_empty() {
        return Err(ApiError::Unauthorized(MessageKey::TokenRequired));
    }

    let claims = state.jwt.validate_token(token).map_err(|e| {
        tracing::debug!("Token rejected: {}", e);
        ApiError::Unauthorized(MessageKey::AuthFailed)
    })?;
    let role = Role::from_str(&claims.role)
        .ok_or(ApiError::Unauthorized(MessageKey::AuthFailed))?;

    let actor = Actor {
        id: claims.id,
        email: claims.email,
        business_id: claims.business_id,
        role,
    };
    tracing::debug!(user_id = %actor.id, business_id = %actor.business_id, "Authenticated");

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

fn actor(request: &Request) -> Result<&Actor, ApiError> {
    request
        .extensions()
        .get::<Actor>()
        .ok_or(ApiError::Unauthorized(MessageKey::AuthRequired))
}

/// Admin only.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let actor = actor(&request)?;
    if !actor.role.is_admin() {
        tracing::warn!(user_id = %actor.id, role = %actor.role, "Access denied: admin role required");
        return Err(ApiError::Forbidden(MessageKey::Forbidden));
    }
    Ok(next.run(request).await)
}

/// Admin or manager.
pub async fn require_manager(request: Request, next: Next) -> Result<Response, ApiError> {
    let actor = actor(&request)?;
    if !actor.role.can_manage() {
        tracing::warn!(user_id = %actor.id, role = %actor.role, "Access denied: manager role required");
        return Err(ApiError::Forbidden(MessageKey::Forbidden));
    }
    Ok(next.run(request).await)
}
