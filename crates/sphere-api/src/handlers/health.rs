use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    environment: String,
    version: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            environment: state.config.app.env.clone(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// 200 once the backing store answers, 503 otherwise.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state
        .probe
        .ping()
        .await
        .map_err(|e| ApiError::ServiceUnavailable(e.to_string()))?;
    Ok(StatusCode::OK)
}
