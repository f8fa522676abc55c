//! # alumni-core
//!
//! Core crate for the alumni portal. Contains configuration schemas,
//! pagination types, and the unified error system shared by every other
//! workspace crate.
//!
//! This crate has **no** internal dependencies on other alumni crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
