//! Database migration management commands.

use clap::{Args, Subcommand};

use alumni_core::config::StoreProvider;
use alumni_core::error::AppError;
use alumni_database::DatabasePool;
use alumni_database::connection::mask_password;
use alumni_database::migration::run_migrations;

use crate::output;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommand,
}

#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

pub async fn execute(args: &MigrateArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    if config.database.provider == StoreProvider::Memory {
        output::print_warning("Configured store is in-memory; nothing to migrate.");
        return Ok(());
    }

    match &args.command {
        MigrateCommand::Run => {
            println!(
                "Running database migrations on {}...",
                mask_password(&config.database.url)
            );
            let db = DatabasePool::connect(&config.database).await?;
            run_migrations(db.pool()).await?;
            db.close().await;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
