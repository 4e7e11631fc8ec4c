// ============================================================================
// Sphere Core - Invitation Entity
// File: crates/sphere-core/src/domain/invitation.rs
// Description: Single-use, time-boxed invitation binding an email to a role
// ============================================================================

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sphere_shared::utils::normalize_email;
use uuid::Uuid;

use super::Role;

/// Invitation entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: Uuid,
    pub invitation_code: String,
    pub email: String,
    pub role: Role,
    pub used: bool,
    /// `None` means the invitation never expires.
    pub expires_at: Option<DateTime<Utc>>,
    pub business_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(
        invitation_code: String,
        email: &str,
        role: Role,
        business_id: Uuid,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        // Saturate rather than overflow for lifetimes past the calendar range
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            id: Uuid::new_v4(),
            invitation_code,
            email: normalize_email(email),
            role,
            used: false,
            expires_at: Some(expires_at),
            business_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Unused and not past its expiry at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.used {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => now <= expires_at,
            None => true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Case-insensitive comparison with the invited address.
    pub fn matches_email(&self, email: &str) -> bool {
        normalize_email(&self.email) == normalize_email(email)
    }

    pub fn is_redeemable_by(&self, email: &str, now: DateTime<Utc>) -> bool {
        self.is_valid_at(now) && self.matches_email(email)
    }

    pub fn change_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    pub fn mark_used(&mut self) {
        self.used = true;
        self.updated_at = Utc::now();
    }
}
