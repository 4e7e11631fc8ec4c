use std::sync::Arc;

use chrono::Duration;
use sphere_core::repositories::StoreProbe;
use sphere_core::services::{AuthService, BusinessService, MemberService};
use sphere_core::Repositories;
use sphere_security::{JwtService, PasswordService};
use sphere_shared::config::AppConfig;
use sphere_shared::constants::MAX_INVITATION_TTL_DAYS;

use crate::middleware::rate_limit::AuthRateLimiter;

/// Shared handles for every request.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub businesses: Arc<BusinessService>,
    pub members: Arc<MemberService>,
    pub jwt: Arc<JwtService>,
    pub probe: Arc<dyn StoreProbe>,
    pub limiter: AuthRateLimiter,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, repos: Repositories) -> Self {
        let jwt = Arc::new(JwtService::new(&config.jwt.secret, config.jwt.token_expiry_secs));
        let passwords = PasswordService::new(config.security.bcrypt_cost);
        let invitation_ttl =
            Duration::days(config.security.invitation_ttl_days.clamp(1, MAX_INVITATION_TTL_DAYS));

        Self {
            auth: Arc::new(AuthService::new(&repos, passwords, jwt.clone())),
            businesses: Arc::new(BusinessService::new(&repos)),
            members: Arc::new(MemberService::new(&repos, invitation_ttl)),
            jwt,
            probe: repos.probe.clone(),
            limiter: AuthRateLimiter::new(&config.rate_limit),
            config: Arc::new(config),
        }
    }
}
