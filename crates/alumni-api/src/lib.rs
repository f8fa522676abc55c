//! # alumni-api
//!
//! HTTP API layer for the alumni portal built on Axum.
//!
//! Provides the REST endpoints, middleware (token authentication, role and
//! permission guards, CORS, request logging), extractors, DTOs, and the
//! mapping from `AppError` to JSON error bodies.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
