//! # Sphere Core - Domain Module
//!
//! Tenancy entities: businesses, their members and pending invitations.

pub mod role;
pub mod business;
pub mod user;
pub mod invitation;
pub mod actor;

pub use role::Role;
pub use business::Business;
pub use user::User;
pub use invitation::Invitation;
pub use actor::Actor;
