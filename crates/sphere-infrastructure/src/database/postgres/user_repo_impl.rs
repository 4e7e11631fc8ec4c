// ============================================================================
// Sphere Infrastructure - PostgreSQL User Repository
// File: crates/sphere-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use sphere_core::domain::{Role, User};
use sphere_core::error::DomainError;
use sphere_core::repositories::UserRepository;

use super::{db_error, unique_violation};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub business_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role: Role::from_str(&row.role).unwrap_or_default(),
            business_id: row.business_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insert a user on an existing connection so callers can run it inside
/// their own transaction.
pub(crate) async fn insert_user(conn: &mut PgConnection, user: &User) -> Result<User, DomainError> {
    let row: UserRow = sqlx::query_as(
        r#"
        INSERT INTO users (
            id, username, email, password_hash, role, business_id, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, username, email, password_hash, role, business_id, created_at, updated_at
        "#,
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(user.business_id)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(conn)
    .await
    .map_err(|e: sqlx::Error| match unique_violation(&e) {
        Some(constraint) if constraint == "users_email_key" => {
            DomainError::EmailAlreadyExists(user.email.clone())
        }
        _ => {
            error!("Database error creating user: {}", e);
            DomainError::DatabaseError(e.to_string())
        }
    })?;

    info!(user_id = %row.id, business_id = %row.business_id, "User created");
    Ok(row.into())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, password_hash, role, business_id, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding user by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, password_hash, role, business_id, created_at, updated_at
            FROM users
            WHERE email = LOWER(TRIM($1))
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding user by email"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_in_business(
        &self,
        id: &Uuid,
        business_id: &Uuid,
    ) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, password_hash, role, business_id, created_at, updated_at
            FROM users
            WHERE id = $1 AND business_id = $2
            "#,
        )
        .bind(id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding user in business"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email_in_business(
        &self,
        email: &str,
        business_id: &Uuid,
    ) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, password_hash, role, business_id, created_at, updated_at
            FROM users
            WHERE email = LOWER(TRIM($1)) AND business_id = $2
            "#,
        )
        .bind(email)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding user by email in business"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_by_business(&self, business_id: &Uuid) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, password_hash, role, business_id, created_at, updated_at
            FROM users
            WHERE business_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing users"))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            UPDATE users
            SET username = $2, role = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, username, email, password_hash, role, business_id, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(user.role.as_str())
        .bind(user.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("updating user"))?;

        row.map(|r| r.into()).ok_or(DomainError::UserNotFound)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("deleting user"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound);
        }
        info!(user_id = %id, "User deleted");
        Ok(())
    }
}
