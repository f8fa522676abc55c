//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use alumni_core::error::AppError;
use alumni_database::store::UserStore;
use alumni_entity::role::ADMIN_ROLE;
use alumni_service::NewUser;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users with their roles
    List,
    /// Create a user holding the admin role
    CreateAdmin {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Overwrite a user's password without the old one
    SetPassword {
        #[arg(short, long)]
        username: String,
        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    roles: String,
    active: bool,
    created_at: String,
}

pub async fn execute(
    args: &UserArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let state = super::connect(config).await?;

    match &args.command {
        UserCommand::List => {
            let rows: Vec<UserRow> = state
                .users
                .list_users()
                .await?
                .into_iter()
                .map(|u| UserRow {
                    id: u.profile.id.to_string(),
                    username: u.profile.username,
                    email: u.profile.email,
                    roles: u.roles.join(", "),
                    active: u.profile.is_active,
                    created_at: u.profile.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        UserCommand::CreateAdmin {
            username,
            email,
            password,
        } => {
            let username = super::prompt_text(username, "Admin username")?;
            let email = super::prompt_text(email, "Admin email")?;
            let password = super::prompt_password(password, "Admin password")?;

            let admin_role = state
                .roles
                .get_role_by_name(ADMIN_ROLE)
                .await?
                .ok_or_else(|| AppError::not_found("Admin role missing; run migrations first"))?;

            let user_id = state
                .credentials
                .register(NewUser {
                    username: username.clone(),
                    email,
                    password,
                    first_name: None,
                    last_name: None,
                    phone: None,
                })
                .await?;
            state.ledger.assign_role(user_id, admin_role.id, None).await?;

            output::print_success(&format!("Admin user '{username}' created"));
            output::print_kv("id", &user_id.to_string());
        }
        UserCommand::SetPassword { username, password } => {
            let user = state
                .stores
                .users
                .find_by_username(username)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{username}' not found")))?;

            let password = super::prompt_password(password, "New password")?;
            state.credentials.set_password(user.id, &password).await?;

            output::print_success(&format!("Password set for user '{username}'"));
        }
    }

    state.stores.close().await;
    Ok(())
}
