//! Repository traits (ports)

pub mod business_repository;
pub mod user_repository;
pub mod invitation_repository;

use async_trait::async_trait;
use std::sync::Arc;

pub use business_repository::BusinessRepository;
pub use user_repository::UserRepository;
pub use invitation_repository::InvitationRepository;

use crate::error::DomainError;

/// Liveness check against the backing store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreProbe: Send + Sync {
    async fn ping(&self) -> Result<(), DomainError>;
}

/// The set of adapters a deployment wires into the services.
#[derive(Clone)]
pub struct Repositories {
    pub businesses: Arc<dyn BusinessRepository>,
    pub users: Arc<dyn UserRepository>,
    pub invitations: Arc<dyn InvitationRepository>,
    pub probe: Arc<dyn StoreProbe>,
}
