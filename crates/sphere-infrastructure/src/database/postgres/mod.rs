//! PostgreSQL repository implementations

pub mod business_repo_impl;
pub mod user_repo_impl;
pub mod invitation_repo_impl;
pub mod probe;

pub use business_repo_impl::PgBusinessRepository;
pub use user_repo_impl::PgUserRepository;
pub use invitation_repo_impl::PgInvitationRepository;
pub use probe::PgStoreProbe;

use sphere_core::error::DomainError;
use tracing::error;

/// Name of the violated unique constraint, if `e` is a unique violation.
pub(crate) fn unique_violation(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Some(db.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// Log and wrap a storage failure that has no domain meaning.
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e: sqlx::Error| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(e.to_string())
    }
}
