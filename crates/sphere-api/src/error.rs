//! API error type and its HTTP rendering

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use sphere_core::DomainError;
use sphere_shared::i18n::{localize, MessageKey};
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0:?}")]
    Unauthorized(MessageKey),

    #[error("Forbidden: {0:?}")]
    Forbidden(MessageKey),

    #[error("Not found: {0:?}")]
    NotFound(MessageKey),

    #[error("Bad request: {0:?}")]
    BadRequest(MessageKey),

    #[error("Validation failed")]
    Validation(Option<Value>),

    #[error("Too many requests, retry after {retry_after_secs}s")]
    TooManyRequests { retry_after_secs: u64 },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut retry_after = None;
        let (status, key, details) = match self {
            ApiError::Unauthorized(key) => {
                tracing::warn!(code = key.code(), "Unauthorized");
                (StatusCode::UNAUTHORIZED, key, None)
            }
            ApiError::Forbidden(key) => {
                tracing::warn!(code = key.code(), "Forbidden");
                (StatusCode::FORBIDDEN, key, None)
            }
            ApiError::NotFound(key) => (StatusCode::NOT_FOUND, key, None),
            ApiError::BadRequest(key) => {
                tracing::debug!(code = key.code(), "Bad request");
                (StatusCode::BAD_REQUEST, key, None)
            }
            ApiError::Validation(details) => {
                tracing::debug!(?details, "Validation failed");
                (StatusCode::BAD_REQUEST, MessageKey::ValidationFailed, details)
            }
            ApiError::TooManyRequests { retry_after_secs } => {
                retry_after = Some(retry_after_secs);
                (StatusCode::TOO_MANY_REQUESTS, MessageKey::TooManyRequests, None)
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, MessageKey::ServiceUnavailable, None)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, MessageKey::ServerError, None)
            }
        };

        let body = Json(ErrorResponse {
            error: key.code(),
            message: localize(key),
            details,
        });

        let mut response = (status, body).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UnknownBusinessCode => ApiError::Unauthorized(MessageKey::InvalidBusinessCode),
            DomainError::InvalidCredentials => ApiError::Unauthorized(MessageKey::InvalidCredentials),
            DomainError::InvalidSignupBusinessCode => {
                ApiError::BadRequest(MessageKey::InvalidBusinessCode)
            }
            DomainError::InvitationInvalid => ApiError::BadRequest(MessageKey::InvitationInvalid),
            DomainError::InvitationEmailMismatch => {
                ApiError::BadRequest(MessageKey::InvitationEmailMismatch)
            }
            DomainError::EmailAlreadyExists(_) => ApiError::BadRequest(MessageKey::EmailInUse),
            DomainError::PasswordTooShort
            | DomainError::PasswordTooLong
            | DomainError::PasswordTooWeak => ApiError::BadRequest(MessageKey::PasswordPolicy),
            DomainError::ValidationError(reason) => {
                ApiError::Validation(Some(serde_json::json!([{ "message": reason }])))
            }
            DomainError::PermissionDenied => ApiError::Forbidden(MessageKey::Forbidden),
            DomainError::OwnerRoleImmutable => ApiError::Forbidden(MessageKey::OwnerRoleImmutable),
            DomainError::CannotRemoveSelf => ApiError::Forbidden(MessageKey::CannotRemoveSelf),
            DomainError::CannotRemoveOwner => ApiError::Forbidden(MessageKey::CannotRemoveOwner),
            DomainError::BusinessNotFound => ApiError::NotFound(MessageKey::BusinessNotFound),
            DomainError::UserNotFound => ApiError::NotFound(MessageKey::UserNotFound),
            other @ (DomainError::PasswordHashError(_)
            | DomainError::TokenGenerationError(_)
            | DomainError::UnableToGenerateUniqueCode
            | DomainError::DatabaseError(_)) => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<Value> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let codes: Vec<String> = errs.iter().map(|e| e.code.to_string()).collect();
                serde_json::json!({ "field": field, "codes": codes })
            })
            .collect();
        fields.sort_by(|a, b| a["field"].as_str().cmp(&b["field"].as_str()));
        ApiError::Validation(Some(Value::Array(fields)))
    }
}
