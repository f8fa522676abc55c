//! # alumni-entity
//!
//! Domain entity models for the alumni portal. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! additionally derive `sqlx::FromRow`.

pub mod alumni;
pub mod assignment;
pub mod role;
pub mod user;
