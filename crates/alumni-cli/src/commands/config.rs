//! Configuration inspection commands.

use clap::{Args, Subcommand};

use alumni_core::error::AppError;
use alumni_database::connection::mask_password;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
    /// Load and validate the configuration file
    Validate,
}

pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;

    match &args.command {
        ConfigCommand::Show => {
            config.auth.jwt_secret = "****".to_string();
            config.database.url = mask_password(&config.database.url);
            output::print_item(&config, format);
        }
        ConfigCommand::Validate => {
            if let Err(e) = config.validate() {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv("environment", config.app.environment.as_str());
            output::print_kv("server", &config.server.bind_address());
            output::print_kv("store", config.database.provider.as_str());
            output::print_kv("database", &mask_password(&config.database.url));
            output::print_kv("admin floor", &format!("{:?}", config.auth.admin_floor));
        }
    }

    Ok(())
}
