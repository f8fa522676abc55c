//! Alumni portal server.
//!
//! Loads configuration, connects the configured store and starts the HTTP API.

use tracing_subscriber::{EnvFilter, fmt};

use alumni_core::config::AppConfig;
use alumni_core::error::AppError;
use alumni_database::Stores;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Defaults, then `config/{ALUMNI_ENV}.toml`, then `ALUMNI__*` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("ALUMNI_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env)?;
    config.validate()?;
    Ok(config)
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.app.environment,
        "Starting {}",
        config.app.name
    );

    tracing::info!(provider = config.database.provider.as_str(), "Connecting store...");
    let stores = Stores::connect(&config.database).await?;
    tracing::info!("Store ready");

    alumni_api::run_server(config, stores).await?;

    tracing::info!("Alumni portal shut down gracefully");
    Ok(())
}
