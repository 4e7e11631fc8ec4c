//! # Sphere Security
//!
//! Security utilities: JWT, password hashing and policy, tenant/invitation codes.

pub mod jwt;
pub mod password;
pub mod codes;

pub use jwt::{Claims, JwtError, JwtService};
pub use password::{PasswordError, PasswordService};
