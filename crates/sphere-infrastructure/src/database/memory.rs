//! In-memory storage
//!
//! Implements every repository trait over a single `RwLock`, so each call is
//! serialized against the others. Multi-record writes validate everything
//! before touching the maps, which keeps them all-or-nothing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use sphere_core::domain::{Business, Invitation, User};
use sphere_core::error::DomainError;
use sphere_core::repositories::{
    BusinessRepository, InvitationRepository, Repositories, StoreProbe, UserRepository,
};
use sphere_shared::utils::normalize_email;

#[derive(Default)]
struct State {
    businesses: HashMap<Uuid, Business>,
    users: HashMap<Uuid, User>,
    invitations: HashMap<Uuid, Invitation>,
}

impl State {
    fn email_taken(&self, email: &str) -> bool {
        self.users.values().any(|u| u.email == email)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share this store behind every repository handle.
    pub fn into_repositories(self) -> Repositories {
        Repositories {
            businesses: Arc::new(self.clone()),
            users: Arc::new(self.clone()),
            invitations: Arc::new(self.clone()),
            probe: Arc::new(self),
        }
    }
}

fn sorted_by_creation<T, F>(mut items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> (chrono::DateTime<Utc>, Uuid),
{
    items.sort_by_key(|item| key(item));
    items
}

#[async_trait]
impl BusinessRepository for InMemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Business>, DomainError> {
        Ok(self.state.read().await.businesses.get(id).cloned())
    }

    async fn find_by_code(&self, business_code: &str) -> Result<Option<Business>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .businesses
            .values()
            .find(|b| b.business_code == business_code)
            .cloned())
    }

    async fn update(&self, business: &Business) -> Result<Business, DomainError> {
        let mut state = self.state.write().await;
        let stored = state
            .businesses
            .get_mut(&business.id)
            .ok_or(DomainError::BusinessNotFound)?;
        stored.name = business.name.clone();
        stored.updated_at = business.updated_at;
        Ok(stored.clone())
    }

    async fn create_with_owner(
        &self,
        business: &Business,
        owner: &User,
    ) -> Result<(Business, User), DomainError> {
        let mut state = self.state.write().await;

        if state
            .businesses
            .values()
            .any(|b| b.business_code == business.business_code)
        {
            return Err(DomainError::UnableToGenerateUniqueCode);
        }
        if state.email_taken(&owner.email) {
            return Err(DomainError::EmailAlreadyExists(owner.email.clone()));
        }

        let mut owner = owner.clone();
        owner.email = normalize_email(&owner.email);
        owner.business_id = business.id;
        let mut business = business.clone();
        business.owner_id = owner.id;

        state.businesses.insert(business.id, business.clone());
        state.users.insert(owner.id, owner.clone());

        info!(business_id = %business.id, owner_id = %owner.id, "Business stored in memory");
        Ok((business, owner))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = normalize_email(email);
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_in_business(
        &self,
        id: &Uuid,
        business_id: &Uuid,
    ) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .get(id)
            .filter(|u| u.belongs_to(business_id))
            .cloned())
    }

    async fn find_by_email_in_business(
        &self,
        email: &str,
        business_id: &Uuid,
    ) -> Result<Option<User>, DomainError> {
        let email = normalize_email(email);
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email == email && u.belongs_to(business_id))
            .cloned())
    }

    async fn list_by_business(&self, business_id: &Uuid) -> Result<Vec<User>, DomainError> {
        let state = self.state.read().await;
        let users = state
            .users
            .values()
            .filter(|u| u.belongs_to(business_id))
            .cloned()
            .collect();
        Ok(sorted_by_creation(users, |u: &User| (u.created_at, u.id)))
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut state = self.state.write().await;
        let stored = state.users.get_mut(&user.id).ok_or(DomainError::UserNotFound)?;
        stored.username = user.username.clone();
        stored.role = user.role;
        stored.updated_at = user.updated_at;
        Ok(stored.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state
            .users
            .remove(id)
            .map(|_| ())
            .ok_or(DomainError::UserNotFound)
    }
}

#[async_trait]
impl InvitationRepository for InMemoryStore {
    async fn find_by_code(&self, invitation_code: &str) -> Result<Option<Invitation>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .invitations
            .values()
            .find(|i| i.invitation_code == invitation_code)
            .cloned())
    }

    async fn find_unused_by_code(
        &self,
        invitation_code: &str,
        business_id: &Uuid,
    ) -> Result<Option<Invitation>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .invitations
            .values()
            .find(|i| {
                i.invitation_code == invitation_code && i.business_id == *business_id && !i.used
            })
            .cloned())
    }

    async fn find_unused_by_email(
        &self,
        email: &str,
        business_id: &Uuid,
    ) -> Result<Option<Invitation>, DomainError> {
        let email = normalize_email(email);
        let state = self.state.read().await;
        Ok(state
            .invitations
            .values()
            .filter(|i| i.email == email && i.business_id == *business_id && !i.used)
            .max_by_key(|i| i.created_at)
            .cloned())
    }

    async fn list_unused_by_business(
        &self,
        business_id: &Uuid,
    ) -> Result<Vec<Invitation>, DomainError> {
        let state = self.state.read().await;
        let invitations = state
            .invitations
            .values()
            .filter(|i| i.business_id == *business_id && !i.used)
            .cloned()
            .collect();
        let mut invitations =
            sorted_by_creation(invitations, |i: &Invitation| (i.created_at, i.id));
        invitations.reverse();
        Ok(invitations)
    }

    async fn create(&self, invitation: &Invitation) -> Result<Invitation, DomainError> {
        let mut state = self.state.write().await;
        if state
            .invitations
            .values()
            .any(|i| i.invitation_code == invitation.invitation_code)
        {
            return Err(DomainError::UnableToGenerateUniqueCode);
        }
        state.invitations.insert(invitation.id, invitation.clone());
        Ok(invitation.clone())
    }

    async fn update(&self, invitation: &Invitation) -> Result<Invitation, DomainError> {
        let mut state = self.state.write().await;
        let stored = state
            .invitations
            .get_mut(&invitation.id)
            .ok_or(DomainError::InvitationInvalid)?;
        stored.role = invitation.role;
        stored.used = invitation.used;
        stored.expires_at = invitation.expires_at;
        stored.updated_at = invitation.updated_at;
        Ok(stored.clone())
    }

    async fn redeem(&self, invitation_id: &Uuid, user: &User) -> Result<User, DomainError> {
        let mut state = self.state.write().await;

        let redeemable = state.invitations.get(invitation_id).is_some_and(|i| {
            i.is_redeemable_by(&user.email, Utc::now()) && i.business_id == user.business_id
        });
        if !redeemable {
            warn!(invitation_id = %invitation_id, "Invitation no longer redeemable");
            return Err(DomainError::InvitationInvalid);
        }
        if state.email_taken(&user.email) {
            return Err(DomainError::EmailAlreadyExists(user.email.clone()));
        }

        if let Some(invitation) = state.invitations.get_mut(invitation_id) {
            invitation.mark_used();
        }
        state.users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}

#[async_trait]
impl StoreProbe for InMemoryStore {
    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
