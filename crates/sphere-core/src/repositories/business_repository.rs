//! Business repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Business, User};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BusinessRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Business>, DomainError>;
    async fn find_by_code(&self, business_code: &str) -> Result<Option<Business>, DomainError>;
    async fn update(&self, business: &Business) -> Result<Business, DomainError>;

    /// Persist a new business together with its first admin.
    ///
    /// The business row, the owner row and the owner back-reference are
    /// written atomically; on any failure nothing is persisted.
    async fn create_with_owner(
        &self,
        business: &Business,
        owner: &User,
    ) -> Result<(Business, User), DomainError>;
}
