// ============================================================================
// Sphere Infrastructure - PostgreSQL Invitation Repository
// File: crates/sphere-infrastructure/src/database/postgres/invitation_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info, warn};
use uuid::Uuid;

use sphere_core::domain::{Invitation, Role, User};
use sphere_core::error::DomainError;
use sphere_core::repositories::InvitationRepository;

use super::user_repo_impl::insert_user;
use super::{db_error, unique_violation};

pub struct PgInvitationRepository {
    pool: PgPool,
}

impl PgInvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct InvitationRow {
    pub id: Uuid,
    pub invitation_code: String,
    pub email: String,
    pub role: String,
    pub used: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub business_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvitationRow> for Invitation {
    fn from(row: InvitationRow) -> Self {
        Invitation {
            id: row.id,
            invitation_code: row.invitation_code,
            email: row.email,
            role: Role::from_str(&row.role).unwrap_or_default(),
            used: row.used,
            expires_at: row.expires_at,
            business_id: row.business_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl InvitationRepository for PgInvitationRepository {
    async fn find_by_code(&self, invitation_code: &str) -> Result<Option<Invitation>, DomainError> {
        let row: Option<InvitationRow> = sqlx::query_as(
            r#"
            SELECT id, invitation_code, email, role, used, expires_at, business_id,
                   created_at, updated_at
            FROM invitations
            WHERE invitation_code = $1
            "#,
        )
        .bind(invitation_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding invitation by code"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_unused_by_code(
        &self,
        invitation_code: &str,
        business_id: &Uuid,
    ) -> Result<Option<Invitation>, DomainError> {
        let row: Option<InvitationRow> = sqlx::query_as(
            r#"
            SELECT id, invitation_code, email, role, used, expires_at, business_id,
                   created_at, updated_at
            FROM invitations
            WHERE invitation_code = $1 AND business_id = $2 AND used = FALSE
            "#,
        )
        .bind(invitation_code)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding unused invitation by code"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_unused_by_email(
        &self,
        email: &str,
        business_id: &Uuid,
    ) -> Result<Option<Invitation>, DomainError> {
        // Newest first when earlier ones were left to expire
        let row: Option<InvitationRow> = sqlx::query_as(
            r#"
            SELECT id, invitation_code, email, role, used, expires_at, business_id,
                   created_at, updated_at
            FROM invitations
            WHERE email = LOWER(TRIM($1)) AND business_id = $2 AND used = FALSE
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding unused invitation by email"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_unused_by_business(
        &self,
        business_id: &Uuid,
    ) -> Result<Vec<Invitation>, DomainError> {
        let rows: Vec<InvitationRow> = sqlx::query_as(
            r#"
            SELECT id, invitation_code, email, role, used, expires_at, business_id,
                   created_at, updated_at
            FROM invitations
            WHERE business_id = $1 AND used = FALSE
            ORDER BY created_at DESC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing invitations"))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, invitation: &Invitation) -> Result<Invitation, DomainError> {
        let row: InvitationRow = sqlx::query_as(
            r#"
            INSERT INTO invitations (
                id, invitation_code, email, role, used, expires_at, business_id,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, invitation_code, email, role, used, expires_at, business_id,
                      created_at, updated_at
            "#,
        )
        .bind(invitation.id)
        .bind(&invitation.invitation_code)
        .bind(&invitation.email)
        .bind(invitation.role.as_str())
        .bind(invitation.used)
        .bind(invitation.expires_at)
        .bind(invitation.business_id)
        .bind(invitation.created_at)
        .bind(invitation.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| match unique_violation(&e) {
            Some(constraint) if constraint == "invitations_invitation_code_key" => {
                error!(invitation_code = %invitation.invitation_code, "Invitation code taken at insert");
                DomainError::UnableToGenerateUniqueCode
            }
            _ => {
                error!("Database error creating invitation: {}", e);
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        info!(invitation_id = %row.id, business_id = %row.business_id, "Invitation created");
        Ok(row.into())
    }

    async fn update(&self, invitation: &Invitation) -> Result<Invitation, DomainError> {
        let row: Option<InvitationRow> = sqlx::query_as(
            r#"
            UPDATE invitations
            SET role = $2, used = $3, expires_at = $4, updated_at = $5
            WHERE id = $1
            RETURNING id, invitation_code, email, role, used, expires_at, business_id,
                      created_at, updated_at
            "#,
        )
        .bind(invitation.id)
        .bind(invitation.role.as_str())
        .bind(invitation.used)
        .bind(invitation.expires_at)
        .bind(invitation.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("updating invitation"))?;

        row.map(|r| r.into()).ok_or(DomainError::InvitationInvalid)
    }

    async fn redeem(&self, invitation_id: &Uuid, user: &User) -> Result<User, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("starting transaction"))?;

        // 1. Lock the invitation; a concurrent redeemer waits here
        let locked: Option<InvitationRow> = sqlx::query_as(
            r#"
            SELECT id, invitation_code, email, role, used, expires_at, business_id,
                   created_at, updated_at
            FROM invitations
            WHERE id = $1 AND used = FALSE
            FOR UPDATE
            "#,
        )
        .bind(invitation_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("locking invitation"))?;

        // 2. Re-check under the lock
        let invitation: Invitation = match locked {
            Some(row) => row.into(),
            None => {
                warn!(invitation_id = %invitation_id, "Invitation already used");
                return Err(DomainError::InvitationInvalid);
            }
        };
        if !invitation.is_redeemable_by(&user.email, Utc::now())
            || invitation.business_id != user.business_id
        {
            warn!(invitation_id = %invitation_id, "Invitation no longer redeemable");
            return Err(DomainError::InvitationInvalid);
        }

        // 3. Member
        let created = insert_user(&mut *tx, user).await?;

        // 4. Consume
        sqlx::query("UPDATE invitations SET used = TRUE, updated_at = $2 WHERE id = $1")
            .bind(invitation_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(db_error("marking invitation used"))?;

        tx.commit().await.map_err(db_error("committing invitation redemption"))?;

        info!(invitation_id = %invitation_id, user_id = %created.id, "Invitation consumed");
        Ok(created)
    }
}
