// ============================================================================
// Sphere Core - Member Service
// File: crates/sphere-core/src/services/member_service.rs
// ============================================================================
//! Membership management inside a single business: listing, inviting,
//! role changes and removal.
//!
//! Every lookup is scoped to the caller's business, so a user id from
//! another tenant behaves exactly like an id that does not exist.

use std::sync::Arc;

use chrono::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

use sphere_security::codes::generate_invitation_code;
use sphere_shared::constants::MAX_CODE_ATTEMPTS;
use sphere_shared::utils::{mask_email, normalize_email};

use crate::domain::{Actor, Invitation, Role, User};
use crate::error::DomainError;
use crate::repositories::{
    BusinessRepository, InvitationRepository, Repositories, UserRepository,
};
use crate::services::{load_admin, load_manager};

pub struct MemberService {
    businesses: Arc<dyn BusinessRepository>,
    users: Arc<dyn UserRepository>,
    invitations: Arc<dyn InvitationRepository>,
    invitation_ttl: Duration,
}

impl MemberService {
    pub fn new(repos: &Repositories, invitation_ttl: Duration) -> Self {
        Self {
            businesses: repos.businesses.clone(),
            users: repos.users.clone(),
            invitations: repos.invitations.clone(),
            invitation_ttl,
        }
    }

    /// All members of the caller's business.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<User>, DomainError> {
        self.users.list_by_business(&actor.business_id).await
    }

    /// Invite `email` into the caller's business with `role`.
    ///
    /// A still-valid pending invitation for the same address is reused and
    /// its role overwritten; otherwise a fresh one is issued.
    pub async fn invite(
        &self,
        actor: &Actor,
        email: &str,
        role: Role,
    ) -> Result<Invitation, DomainError> {
        load_admin(self.users.as_ref(), actor).await?;
        let email = normalize_email(email);

        if self.users.find_by_email(&email).await?.is_some() {
            warn!(email = %mask_email(&email), "Invite rejected: email already registered");
            return Err(DomainError::EmailAlreadyExists(email));
        }

        let pending = self
            .invitations
            .find_unused_by_email(&email, &actor.business_id)
            .await?
            .filter(|invitation| invitation.is_valid());

        let invitation = match pending {
            Some(mut invitation) => {
                invitation.change_role(role);
                let invitation = self.invitations.update(&invitation).await?;
                info!(invitation_id = %invitation.id, role = %role, "Pending invitation reused");
                invitation
            }
            None => {
                let code = self.unique_invitation_code().await?;
                let invitation =
                    Invitation::new(code, &email, role, actor.business_id, self.invitation_ttl);
                let invitation = self.invitations.create(&invitation).await?;
                info!(invitation_id = %invitation.id, role = %role, "Invitation issued");
                invitation
            }
        };

        Ok(invitation)
    }

    /// Change a member's role. The business owner's role is fixed.
    pub async fn update_role(
        &self,
        actor: &Actor,
        user_id: &Uuid,
        role: Role,
    ) -> Result<User, DomainError> {
        load_admin(self.users.as_ref(), actor).await?;

        let mut target = self.member(actor, user_id).await?;
        if self.is_owner(&target).await? {
            warn!(user_id = %target.id, "Refused to change the owner's role");
            return Err(DomainError::OwnerRoleImmutable);
        }

        target.change_role(role);
        let updated = self.users.update(&target).await?;
        info!(user_id = %updated.id, role = %role, changed_by = %actor.id, "Member role changed");
        Ok(updated)
    }

    /// Remove a member from the caller's business.
    pub async fn remove(&self, actor: &Actor, user_id: &Uuid) -> Result<(), DomainError> {
        load_admin(self.users.as_ref(), actor).await?;

        let target = self.member(actor, user_id).await?;
        if target.id == actor.id {
            return Err(DomainError::CannotRemoveSelf);
        }
        if self.is_owner(&target).await? {
            warn!(user_id = %target.id, "Refused to remove the owner");
            return Err(DomainError::CannotRemoveOwner);
        }

        self.users.delete(&target.id).await?;
        info!(user_id = %target.id, removed_by = %actor.id, "Member removed");
        Ok(())
    }

    /// Invitations that can still be redeemed. Managers and admins only.
    pub async fn list_pending_invitations(
        &self,
        actor: &Actor,
    ) -> Result<Vec<Invitation>, DomainError> {
        load_manager(self.users.as_ref(), actor).await?;

        let invitations = self
            .invitations
            .list_unused_by_business(&actor.business_id)
            .await?;
        Ok(invitations.into_iter().filter(Invitation::is_valid).collect())
    }

    async fn member(&self, actor: &Actor, user_id: &Uuid) -> Result<User, DomainError> {
        self.users
            .find_in_business(user_id, &actor.business_id)
            .await?
            .ok_or(DomainError::UserNotFound)
    }

    async fn is_owner(&self, user: &User) -> Result<bool, DomainError> {
        let business = self
            .businesses
            .find_by_id(&user.business_id)
            .await?
            .ok_or(DomainError::BusinessNotFound)?;
        Ok(business.is_owned_by(&user.id))
    }

    async fn unique_invitation_code(&self) -> Result<String, DomainError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_invitation_code();
            if self.invitations.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }
            warn!(invitation_code = %code, "Invitation code collision, retrying");
        }
        error!("Gave up allocating an invitation code after {} attempts", MAX_CODE_ATTEMPTS);
        Err(DomainError::UnableToGenerateUniqueCode)
    }
}
