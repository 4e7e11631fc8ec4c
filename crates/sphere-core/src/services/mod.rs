//! Domain services (business logic)

pub mod auth_service;
pub mod business_service;
pub mod member_service;

pub use auth_service::{AuthService, AuthSession};
pub use business_service::BusinessService;
pub use member_service::MemberService;

use tracing::warn;

use crate::domain::{Actor, User};
use crate::error::DomainError;
use crate::repositories::UserRepository;

/// Load the caller's stored record and require the admin role on it.
///
/// The token role is not trusted here: a demoted admin keeps a token that
/// still says `admin` until it expires.
pub(crate) async fn load_admin(
    users: &dyn UserRepository,
    actor: &Actor,
) -> Result<User, DomainError> {
    match users.find_by_id(&actor.id).await? {
        Some(user) if user.belongs_to(&actor.business_id) && user.role.is_admin() => Ok(user),
        _ => {
            warn!(user_id = %actor.id, business_id = %actor.business_id, "Admin check failed");
            Err(DomainError::PermissionDenied)
        }
    }
}

/// Same as [`load_admin`] but admits managers too.
pub(crate) async fn load_manager(
    users: &dyn UserRepository,
    actor: &Actor,
) -> Result<User, DomainError> {
    match users.find_by_id(&actor.id).await? {
        Some(user) if user.belongs_to(&actor.business_id) && user.role.can_manage() => Ok(user),
        _ => {
            warn!(user_id = %actor.id, business_id = %actor.business_id, "Manager check failed");
            Err(DomainError::PermissionDenied)
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use uuid::Uuid;

    use crate::domain::{Actor, Business, Role, User};
    use crate::repositories::business_repository::MockBusinessRepository;
    use crate::repositories::invitation_repository::MockInvitationRepository;
    use crate::repositories::user_repository::MockUserRepository;
    use crate::repositories::{MockStoreProbe, Repositories};

    pub fn repositories(
        businesses: MockBusinessRepository,
        users: MockUserRepository,
        invitations: MockInvitationRepository,
    ) -> Repositories {
        Repositories {
            businesses: Arc::new(businesses),
            users: Arc::new(users),
            invitations: Arc::new(invitations),
            probe: Arc::new(MockStoreProbe::new()),
        }
    }

    pub fn business_owned_by(owner: &User) -> Business {
        let mut business = Business::new("Sphere Inc.", "BABC123".into(), owner.id);
        business.id = owner.business_id;
        business
    }

    pub fn member(role: Role, business_id: Uuid) -> User {
        let name = format!("{}-{}", role.as_str(), &Uuid::new_v4().to_string()[..8]);
        User::new(&name, &format!("{}@example.com", name), "hash".into(), role, business_id)
    }

    pub fn actor_for(user: &User) -> Actor {
        Actor {
            id: user.id,
            email: user.email.clone(),
            business_id: user.business_id,
            role: user.role,
        }
    }
}
