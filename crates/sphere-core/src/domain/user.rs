//! User domain entity

use chrono::{DateTime, Utc};
use serde::Serialize;
use sphere_shared::utils::normalize_email;
use uuid::Uuid;

use super::Role;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub business_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: &str,
        email: &str,
        password_hash: String,
        role: Role,
        business_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.trim().to_string(),
            email: normalize_email(email),
            password_hash,
            role,
            business_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn belongs_to(&self, business_id: &Uuid) -> bool {
        self.business_id == *business_id
    }

    pub fn change_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}
