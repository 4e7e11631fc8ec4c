//! Invitation repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Invitation, User};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Lookup by code across all businesses, used for collision checks.
    async fn find_by_code(&self, invitation_code: &str) -> Result<Option<Invitation>, DomainError>;
    async fn find_unused_by_code(
        &self,
        invitation_code: &str,
        business_id: &Uuid,
    ) -> Result<Option<Invitation>, DomainError>;
    async fn find_unused_by_email(
        &self,
        email: &str,
        business_id: &Uuid,
    ) -> Result<Option<Invitation>, DomainError>;
    async fn list_unused_by_business(
        &self,
        business_id: &Uuid,
    ) -> Result<Vec<Invitation>, DomainError>;
    async fn create(&self, invitation: &Invitation) -> Result<Invitation, DomainError>;
    async fn update(&self, invitation: &Invitation) -> Result<Invitation, DomainError>;

    /// Consume the invitation and create the invited user in one unit.
    ///
    /// The invitation is re-checked while locked: if it has been used in the
    /// meantime this fails with `InvitationInvalid` and no user is created.
    async fn redeem(&self, invitation_id: &Uuid, user: &User) -> Result<User, DomainError>;
}
