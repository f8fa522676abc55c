//! Start the HTTP server.

use clap::Args;

use alumni_core::error::AppError;
use alumni_database::Stores;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,
}

pub async fn execute(args: &ServeArgs, config_path: &str) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    config.validate()?;

    println!("Starting alumni portal...");
    println!("  Address: {}", config.server.bind_address());
    println!("  Store:   {}", config.database.provider.as_str());

    let stores = Stores::connect(&config.database).await?;
    alumni_api::run_server(config, stores).await
}
