//! Business profile reads and admin updates

use std::sync::Arc;

use tracing::{info, warn};

use sphere_shared::constants::MAX_BUSINESS_NAME_LENGTH;

use crate::domain::{Actor, Business};
use crate::error::DomainError;
use crate::repositories::{BusinessRepository, Repositories, UserRepository};
use crate::services::load_admin;

pub struct BusinessService {
    businesses: Arc<dyn BusinessRepository>,
    users: Arc<dyn UserRepository>,
}

impl BusinessService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            businesses: repos.businesses.clone(),
            users: repos.users.clone(),
        }
    }

    /// The caller's own business.
    pub async fn get(&self, actor: &Actor) -> Result<Business, DomainError> {
        self.businesses
            .find_by_id(&actor.business_id)
            .await?
            .ok_or(DomainError::BusinessNotFound)
    }

    /// Rename the caller's business. Admin only; the code never changes.
    pub async fn update_name(&self, actor: &Actor, name: &str) -> Result<Business, DomainError> {
        load_admin(self.users.as_ref(), actor).await?;

        let name = name.trim();
        if name.is_empty() || name.chars().count() as u64 > MAX_BUSINESS_NAME_LENGTH {
            warn!(business_id = %actor.business_id, "Rejected business name");
            return Err(DomainError::ValidationError("invalid business name".into()));
        }

        let mut business = self.get(actor).await?;
        business.rename(name);
        let business = self.businesses.update(&business).await?;

        info!(business_id = %business.id, user_id = %actor.id, "Business renamed");
        Ok(business)
    }
}
