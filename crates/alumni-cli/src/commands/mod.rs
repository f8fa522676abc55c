//! CLI command definitions and dispatch.

pub mod config;
pub mod migrate;
pub mod role;
pub mod serve;
pub mod user;

use clap::{Parser, Subcommand};

use alumni_api::AppState;
use alumni_core::config::AppConfig;
use alumni_core::error::AppError;
use alumni_database::Stores;

use crate::output::OutputFormat;

/// Alumni portal administration
#[derive(Debug, Parser)]
#[command(name = "alumni", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Role inspection
    Roles(role::RoleArgs),
    /// User management
    Users(user::UserArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Roles(args) => role::execute(args, &self.config, self.format).await,
            Commands::Users(args) => user::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_file(config_path)
}

/// Helper: connect the configured stores and wire the services over them.
pub async fn connect(config: AppConfig) -> Result<AppState, AppError> {
    let stores = Stores::connect(&config.database).await?;
    Ok(AppState::new(config, stores))
}

/// Helper: read a line, or return the value given on the command line.
pub fn prompt_text(value: &Option<String>, prompt: &str) -> Result<String, AppError> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}

/// Helper: read a password twice, or return the value given on the command line.
pub fn prompt_password(value: &Option<String>, prompt: &str) -> Result<String, AppError> {
    match value {
        Some(p) => Ok(p.clone()),
        None => dialoguer::Password::new()
            .with_prompt(prompt)
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}
