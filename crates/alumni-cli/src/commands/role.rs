//! Role inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use alumni_core::error::AppError;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct RoleArgs {
    #[command(subcommand)]
    pub command: RoleCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// List all roles with their permissions
    List,
}

/// Role display row for table output
#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    name: String,
    built_in: bool,
    permissions: String,
    description: String,
}

pub async fn execute(
    args: &RoleArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let state = super::connect(config).await?;

    match &args.command {
        RoleCommand::List => {
            let rows: Vec<RoleRow> = state
                .roles
                .list_roles()
                .await?
                .into_iter()
                .map(|r| RoleRow {
                    built_in: r.is_built_in(),
                    permissions: r.permissions.iter().collect::<Vec<_>>().join(", "),
                    description: r.description.unwrap_or_default(),
                    name: r.name,
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    state.stores.close().await;
    Ok(())
}
