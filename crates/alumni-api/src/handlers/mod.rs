//! Route handlers organized by domain.

pub mod alumni;
pub mod auth;
#[cfg(feature = "dev-endpoints")]
pub mod debug;
pub mod health;
pub mod roles;
pub mod users;
