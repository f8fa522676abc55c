//! Database migration runner.
//!
//! The schema, including the built-in role seed, lives in the workspace
//! `migrations/` directory and is embedded at compile time.

use sqlx::PgPool;
use tracing::info;

use alumni_core::error::{AppError, ErrorKind};

/// Apply every pending migration.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Applying database migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to run migrations", e))?;

    info!("Database schema is up to date");
    Ok(())
}
