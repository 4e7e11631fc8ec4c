// ============================================================================
// Sphere Core - Authentication Service
// File: crates/sphere-core/src/services/auth_service.rs
// ============================================================================
//! Login, business creation and invitation sign-up

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use sphere_security::codes::{generate_business_code, normalize_code};
use sphere_security::{JwtService, PasswordService};
use sphere_shared::constants::MAX_CODE_ATTEMPTS;
use sphere_shared::utils::{mask_email, normalize_email};

use crate::domain::{Business, Role, User};
use crate::error::DomainError;
use crate::repositories::{
    BusinessRepository, InvitationRepository, Repositories, UserRepository,
};

/// Outcome of every successful authentication flow.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
    pub business: Business,
}

/// Authentication service for the three ways into a business
pub struct AuthService {
    businesses: Arc<dyn BusinessRepository>,
    users: Arc<dyn UserRepository>,
    invitations: Arc<dyn InvitationRepository>,
    passwords: PasswordService,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(repos: &Repositories, passwords: PasswordService, jwt: Arc<JwtService>) -> Self {
        Self {
            businesses: repos.businesses.clone(),
            users: repos.users.clone(),
            invitations: repos.invitations.clone(),
            passwords,
            jwt,
        }
    }

    /// Login with email and password inside the business named by `business_code`.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        business_code: &str,
    ) -> Result<AuthSession, DomainError> {
        let code = normalize_code(business_code);
        let email = normalize_email(email);
        info!(business_code = %code, email = %mask_email(&email), "Login attempt");

        // 1. Resolve the tenant
        let business = self.businesses.find_by_code(&code).await?.ok_or_else(|| {
            warn!(business_code = %code, "Login failed: unknown business code");
            DomainError::UnknownBusinessCode
        })?;

        // 2. Find the member inside that tenant only
        let user = self
            .users
            .find_by_email_in_business(&email, &business.id)
            .await?
            .ok_or_else(|| {
                warn!(business_id = %business.id, "Login failed: no such member");
                DomainError::InvalidCredentials
            })?;

        // 3. Verify password
        let password_valid = self.passwords.verify(password, &user.password_hash).map_err(|e| {
            error!(user_id = %user.id, "Stored password hash is unusable: {}", e);
            DomainError::InvalidCredentials
        })?;

        if !password_valid {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(DomainError::InvalidCredentials);
        }

        info!(user_id = %user.id, business_id = %business.id, "Login successful");
        self.issue_session(user, business)
    }

    /// Create a business and its owning admin in one step.
    pub async fn create_business(
        &self,
        business_name: &str,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<AuthSession, DomainError> {
        let email = normalize_email(email);
        info!(email = %mask_email(&email), "Business creation attempt");

        // 1. Password policy
        PasswordService::check_policy(password)?;

        if business_name.trim().is_empty() {
            return Err(DomainError::ValidationError("business name is required".into()));
        }

        // 2. Email must be unused across all businesses
        if self.users.find_by_email(&email).await?.is_some() {
            warn!(email = %mask_email(&email), "Business creation failed: email in use");
            return Err(DomainError::EmailAlreadyExists(email));
        }

        // 3. Allocate a business code
        let business_code = self.unique_business_code().await?;

        // 4. Hash password
        let password_hash = self.passwords.hash(password)?;

        // 5. Build both records; the owner back-reference is set before persisting
        let mut business = Business::new(business_name, business_code, Uuid::nil());
        let owner = User::new(username, &email, password_hash, Role::Admin, business.id);
        business.owner_id = owner.id;

        // 6. Persist atomically
        let (business, owner) = self.businesses.create_with_owner(&business, &owner).await?;

        info!(
            business_id = %business.id,
            business_code = %business.business_code,
            owner_id = %owner.id,
            "Business created"
        );
        self.issue_session(owner, business)
    }

    /// Join an existing business by redeeming an invitation.
    pub async fn signup_with_invitation(
        &self,
        email: &str,
        password: &str,
        username: &str,
        business_code: &str,
        invitation_code: &str,
    ) -> Result<AuthSession, DomainError> {
        let email = normalize_email(email);
        let business_code = normalize_code(business_code);
        let invitation_code = normalize_code(invitation_code);
        info!(
            business_code = %business_code,
            email = %mask_email(&email),
            "Invitation sign-up attempt"
        );

        PasswordService::check_policy(password)?;

        // 1. Resolve the tenant
        let business = self
            .businesses
            .find_by_code(&business_code)
            .await?
            .ok_or_else(|| {
                warn!(business_code = %business_code, "Sign-up failed: unknown business code");
                DomainError::InvalidSignupBusinessCode
            })?;

        // 2. The invitation must belong to that tenant, be unused and unexpired
        let invitation = self
            .invitations
            .find_unused_by_code(&invitation_code, &business.id)
            .await?
            .filter(|invitation| invitation.is_valid_at(Utc::now()))
            .ok_or_else(|| {
                warn!(business_id = %business.id, "Sign-up failed: invitation invalid or expired");
                DomainError::InvitationInvalid
            })?;

        // 3. Only the invited address may redeem it
        if !invitation.matches_email(&email) {
            warn!(invitation_id = %invitation.id, "Sign-up failed: email mismatch");
            return Err(DomainError::InvitationEmailMismatch);
        }

        // 4. Email must be unused across all businesses
        if self.users.find_by_email(&email).await?.is_some() {
            warn!(email = %mask_email(&email), "Sign-up failed: email in use");
            return Err(DomainError::EmailAlreadyExists(email));
        }

        // 5. Create the member and consume the invitation together
        let password_hash = self.passwords.hash(password)?;
        let user = User::new(username, &email, password_hash, invitation.role, business.id);
        let user = self.invitations.redeem(&invitation.id, &user).await?;

        info!(
            user_id = %user.id,
            business_id = %business.id,
            role = %user.role,
            "Invitation redeemed"
        );
        self.issue_session(user, business)
    }

    fn issue_session(&self, user: User, business: Business) -> Result<AuthSession, DomainError> {
        let token = self
            .jwt
            .generate_token(&user.id, &user.email, &user.business_id, user.role.as_str())
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        Ok(AuthSession { token, user, business })
    }

    async fn unique_business_code(&self) -> Result<String, DomainError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_business_code();
            if self.businesses.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }
            warn!(business_code = %code, "Business code collision, retrying");
        }
        error!("Gave up allocating a business code after {} attempts", MAX_CODE_ATTEMPTS);
        Err(DomainError::UnableToGenerateUniqueCode)
    }
}
