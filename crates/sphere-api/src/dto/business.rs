//! Business payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use sphere_core::Business;

use super::validate_business_name;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBusinessRequest {
    #[validate(custom(function = "validate_business_name"))]
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDto {
    pub id: Uuid,
    pub name: String,
    pub business_code: String,
    pub created_at: DateTime<Utc>,
}

impl From<Business> for BusinessDto {
    fn from(business: Business) -> Self {
        Self {
            id: business.id,
            name: business.name,
            business_code: business.business_code,
            created_at: business.created_at,
        }
    }
}
