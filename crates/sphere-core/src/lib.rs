//! # Sphere Core
//!
//! Tenancy domain entities, services, and repository traits.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
pub use repositories::Repositories;
