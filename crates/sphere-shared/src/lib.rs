//! # Sphere Shared
//!
//! Shared configuration, telemetry, localized messages and utilities.

pub mod constants;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;
pub mod i18n;

pub use error::AppError;
pub use i18n::{Locale, MessageKey};
