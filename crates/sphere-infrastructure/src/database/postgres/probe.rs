//! Readiness probe

use async_trait::async_trait;
use sqlx::PgPool;

use sphere_core::error::DomainError;
use sphere_core::repositories::StoreProbe;

use super::db_error;

pub struct PgStoreProbe {
    pool: PgPool,
}

impl PgStoreProbe {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreProbe for PgStoreProbe {
    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error("pinging database"))?;
        Ok(())
    }
}
