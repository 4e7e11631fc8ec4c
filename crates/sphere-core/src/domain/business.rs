// ============================================================================
// Sphere Core - Business Entity
// File: crates/sphere-core/src/domain/business.rs
// Description: Tenant account identified by a shareable business code
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Business (tenant) entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub business_code: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Business {
    pub fn new(name: &str, business_code: String, owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            business_code,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: &Uuid) -> bool {
        self.owner_id == *user_id
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.trim().to_string();
        self.updated_at = Utc::now();
    }
}
