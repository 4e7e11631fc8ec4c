// ============================================================================
// Sphere Infrastructure - PostgreSQL Business Repository
// File: crates/sphere-infrastructure/src/database/postgres/business_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use sphere_core::domain::{Business, User};
use sphere_core::error::DomainError;
use sphere_core::repositories::BusinessRepository;

use super::user_repo_impl::insert_user;
use super::{db_error, unique_violation};

pub struct PgBusinessRepository {
    pool: PgPool,
}

impl PgBusinessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BusinessRow {
    pub id: Uuid,
    pub name: String,
    pub business_code: String,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BusinessRow> for Business {
    fn from(row: BusinessRow) -> Self {
        Business {
            id: row.id,
            name: row.name,
            business_code: row.business_code,
            owner_id: row.owner_id.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl BusinessRepository for PgBusinessRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Business>, DomainError> {
        let row: Option<BusinessRow> = sqlx::query_as(
            r#"
            SELECT id, name, business_code, owner_id, created_at, updated_at
            FROM businesses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding business by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_code(&self, business_code: &str) -> Result<Option<Business>, DomainError> {
        let row: Option<BusinessRow> = sqlx::query_as(
            r#"
            SELECT id, name, business_code, owner_id, created_at, updated_at
            FROM businesses
            WHERE business_code = $1
            "#,
        )
        .bind(business_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding business by code"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn update(&self, business: &Business) -> Result<Business, DomainError> {
        let row: Option<BusinessRow> = sqlx::query_as(
            r#"
            UPDATE businesses
            SET name = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, name, business_code, owner_id, created_at, updated_at
            "#,
        )
        .bind(business.id)
        .bind(&business.name)
        .bind(business.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("updating business"))?;

        row.map(|r| r.into()).ok_or(DomainError::BusinessNotFound)
    }

    async fn create_with_owner(
        &self,
        business: &Business,
        owner: &User,
    ) -> Result<(Business, User), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("starting transaction"))?;

        // 1. Business without owner; the FK target does not exist yet
        sqlx::query(
            r#"
            INSERT INTO businesses (id, name, business_code, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, NULL, $4, $5)
            "#,
        )
        .bind(business.id)
        .bind(&business.name)
        .bind(&business.business_code)
        .bind(business.created_at)
        .bind(business.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e: sqlx::Error| match unique_violation(&e) {
            Some(constraint) if constraint == "businesses_business_code_key" => {
                error!(business_code = %business.business_code, "Business code taken at insert");
                DomainError::UnableToGenerateUniqueCode
            }
            _ => {
                error!("Database error creating business: {}", e);
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        // 2. Owner
        let owner = insert_user(&mut *tx, owner).await?;

        // 3. Back-reference
        let row: BusinessRow = sqlx::query_as(
            r#"
            UPDATE businesses
            SET owner_id = $2
            WHERE id = $1
            RETURNING id, name, business_code, owner_id, created_at, updated_at
            "#,
        )
        .bind(business.id)
        .bind(owner.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("setting business owner"))?;

        tx.commit().await.map_err(db_error("committing business creation"))?;

        info!(business_id = %row.id, owner_id = %owner.id, "Business persisted");
        Ok((row.into(), owner))
    }
}
