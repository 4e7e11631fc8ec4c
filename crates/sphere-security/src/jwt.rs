//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
    #[error("Token expired")]
    TokenExpired,
}

/// Identity carried by a session token.
///
/// Field names are camelCase on the wire so tokens stay readable by the
/// browser client, which decodes `businessId` and `role` directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: Uuid,
    pub email: String,
    pub business_id: Uuid,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry: i64,
}

impl JwtService {
    pub fn new(secret: &str, token_expiry_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry: token_expiry_secs,
        }
    }

    pub fn generate_token(
        &self,
        user_id: &Uuid,
        email: &str,
        business_id: &Uuid,
        role: &str,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expires_at = Duration::try_seconds(self.token_expiry)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| JwtError::CreationError("token expiry out of range".into()))?;
        let claims = Claims {
            id: *user_id,
            email: email.to_string(),
            business_id: *business_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreationError(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::ValidationError(e.to_string()),
            })
    }
}
