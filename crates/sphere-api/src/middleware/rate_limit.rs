//! Per-client rate limiting for the authentication endpoints

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{clock::Clock, clock::DefaultClock, DefaultKeyedRateLimiter, Quota, RateLimiter};
use sphere_shared::config::RateLimitSettings;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::ApiError;
use crate::state::AppState;

/// How often idle client entries are pruned from the limiter.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Keyed limiter shared by all auth routes. Disabled when `None`.
#[derive(Clone)]
pub struct AuthRateLimiter {
    limiter: Option<Arc<DefaultKeyedRateLimiter<IpAddr>>>,
}

impl AuthRateLimiter {
    pub fn new(settings: &RateLimitSettings) -> Self {
        if !settings.enabled {
            return Self { limiter: None };
        }

        let per_minute = NonZeroU32::new(settings.auth_requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(settings.burst).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_minute(per_minute).allow_burst(burst);

        Self {
            limiter: Some(Arc::new(RateLimiter::keyed(quota))),
        }
    }

    /// `Err` carries the number of seconds to wait.
    pub fn check(&self, ip: IpAddr) -> Result<(), u64> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };
        limiter.check_key(&ip).map_err(|not_until| {
            not_until
                .wait_time_from(DefaultClock::default().now())
                .as_secs()
                .max(1)
        })
    }

    /// Drop clients whose quota has fully replenished.
    pub fn cleanup(&self) {
        let Some(limiter) = &self.limiter else {
            return;
        };
        let before = limiter.len();
        limiter.retain_recent();
        limiter.shrink_to_fit();
        tracing::debug!(before, after = limiter.len(), "Pruned rate limit state");
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.as_ref().map_or(0, |limiter| limiter.len())
    }

    /// Run [`cleanup`](Self::cleanup) every `period` on the current runtime.
    /// Returns `None` when rate limiting is disabled.
    pub fn spawn_cleanup(&self, period: Duration) -> Option<JoinHandle<()>> {
        self.limiter.as_ref()?;
        let limiter = self.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                limiter.cleanup();
            }
        }))
    }
}

pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if let Err(retry_after_secs) = state.limiter.check(ip) {
        tracing::warn!(client_ip = %ip, retry_after_secs, "Rate limit exceeded");
        return Err(ApiError::TooManyRequests { retry_after_secs });
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(enabled: bool, burst: u32) -> RateLimitSettings {
        RateLimitSettings {
            enabled,
            auth_requests_per_minute: 1,
            burst,
        }
    }

    /// One request per millisecond, so state goes idle almost immediately.
    fn fast_refill() -> RateLimitSettings {
        RateLimitSettings {
            enabled: true,
            auth_requests_per_minute: 60_000,
            burst: 1,
        }
    }

    fn client(n: u32) -> IpAddr {
        IpAddr::V4(Ipv4Addr::from(0x0a00_0000 + n))
    }

    #[test]
    fn test_burst_then_reject() {
        let limiter = AuthRateLimiter::new(&settings(true, 2));
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));

        assert!(limiter.check(ip).is_ok());
        assert!(limiter.check(ip).is_ok());
        let wait = limiter.check(ip).unwrap_err();
        assert!(wait >= 1);
    }

    #[test]
    fn test_clients_are_limited_independently() {
        let limiter = AuthRateLimiter::new(&settings(true, 1));
        let first = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let second = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!(limiter.check(first).is_ok());
        assert!(limiter.check(first).is_err());
        assert!(limiter.check(second).is_ok());
    }

    #[test]
    fn test_disabled_never_limits() {
        let limiter = AuthRateLimiter::new(&settings(false, 1));
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        for _ in 0..100 {
            assert!(limiter.check(ip).is_ok());
        }
    }

    #[test]
    fn test_cleanup_forgets_idle_clients() {
        let limiter = AuthRateLimiter::new(&fast_refill());
        for n in 0..1_000 {
            assert!(limiter.check(client(n)).is_ok());
        }
        assert_eq!(limiter.tracked_clients(), 1_000);

        std::thread::sleep(Duration::from_millis(50));
        limiter.cleanup();
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn test_cleanup_keeps_limited_clients() {
        let limiter = AuthRateLimiter::new(&settings(true, 1));
        let ip = client(1);
        assert!(limiter.check(ip).is_ok());

        limiter.cleanup();
        assert_eq!(limiter.tracked_clients(), 1);
        assert!(limiter.check(ip).is_err());
    }

    #[tokio::test]
    async fn test_spawned_cleanup_prunes_on_first_tick() {
        let limiter = AuthRateLimiter::new(&fast_refill());
        assert!(limiter.check(client(7)).is_ok());
        tokio::time::sleep(Duration::from_millis(20)).await;

        let handle = limiter.spawn_cleanup(CLEANUP_INTERVAL).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(limiter.tracked_clients(), 0);
        handle.abort();
    }

    #[test]
    fn test_disabled_limiter_tracks_nothing() {
        let limiter = AuthRateLimiter::new(&settings(false, 1));
        limiter.cleanup();
        assert_eq!(limiter.tracked_clients(), 0);
    }
}
