//! Request extractors

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that is deserialized and then validated.
///
/// Both a body that does not parse and one that fails validation are
/// rejected with `400 VALIDATION_ERROR`.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            ApiError::Validation(None)
        })?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
