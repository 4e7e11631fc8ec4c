//! Database module (PostgreSQL and in-memory adapters)

pub mod connection;
pub mod memory;
pub mod postgres;

use thiserror::Error;

pub use connection::{create_pool, run_migrations};
pub use postgres::{PgBusinessRepository, PgInvitationRepository, PgStoreProbe, PgUserRepository};

/// Startup failures while preparing storage.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Database connection failed: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
