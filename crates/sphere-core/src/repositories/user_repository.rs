//! User repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::User;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError>;
    /// Lookup across all businesses; emails are globally unique.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn find_in_business(
        &self,
        id: &Uuid,
        business_id: &Uuid,
    ) -> Result<Option<User>, DomainError>;
    async fn find_by_email_in_business(
        &self,
        email: &str,
        business_id: &Uuid,
    ) -> Result<Option<User>, DomainError>;
    async fn list_by_business(&self, business_id: &Uuid) -> Result<Vec<User>, DomainError>;
    async fn update(&self, user: &User) -> Result<User, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
}
