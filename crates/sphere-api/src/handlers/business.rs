//! Business profile handlers

use axum::{extract::State, Extension, Json};
use sphere_core::Actor;

use crate::dto::{BusinessDto, UpdateBusinessRequest};
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// GET /api/business
pub async fn get_business(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<BusinessDto>, ApiError> {
    let business = state.businesses.get(&actor).await?;
    Ok(Json(business.into()))
}

/// PUT /api/business
pub async fn update_business(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(payload): ValidatedJson<UpdateBusinessRequest>,
) -> Result<Json<BusinessDto>, ApiError> {
    let business = state.businesses.update_name(&actor, &payload.name).await?;
    Ok(Json(business.into()))
}
