//! # Sphere Infrastructure
//!
//! Storage adapters for the core repository traits: PostgreSQL for
//! deployments and an in-memory store for local runs and tests.

pub mod database;

use std::sync::Arc;

use sphere_core::Repositories;
use sphere_shared::config::{DatabaseBackend, DatabaseSettings};
use tracing::info;

pub use database::memory::InMemoryStore;
pub use database::{
    create_pool, run_migrations, InfraError, PgBusinessRepository, PgInvitationRepository,
    PgStoreProbe, PgUserRepository,
};

/// Wire the configured backend into a [`Repositories`] set.
pub async fn build_repositories(settings: &DatabaseSettings) -> Result<Repositories, InfraError> {
    match settings.backend {
        DatabaseBackend::Postgres => {
            let pool = create_pool(settings).await?;
            if settings.run_migrations {
                run_migrations(&pool).await?;
            }
            info!("Using PostgreSQL storage");
            Ok(Repositories {
                businesses: Arc::new(PgBusinessRepository::new(pool.clone())),
                users: Arc::new(PgUserRepository::new(pool.clone())),
                invitations: Arc::new(PgInvitationRepository::new(pool.clone())),
                probe: Arc::new(PgStoreProbe::new(pool)),
            })
        }
        DatabaseBackend::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            Ok(InMemoryStore::new().into_repositories())
        }
    }
}
