//! HTTP handlers

pub mod auth;
pub mod business;
pub mod health;
pub mod users;
