//! Coach Score Main Entry Point
//!
//! Serves the review and vote HTTP API backed by PostgreSQL.

use coach_score::{CoachScoreError, Config, Dependencies, LogFormat, server};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "coach_score=info,coach_score_repository=info,tower_http=info";

/// Initialize tracing/logging.
fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
                .init();
        }
    }

    info!(
        service_name = "coach-score",
        service_version = env!("CARGO_PKG_VERSION"),
        log_format = ?format,
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), CoachScoreError> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    info!("Starting Coach Score");

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let app = server::create_app(deps.state, config.cors_allowed_origins);

    if let Err(e) = server::run_server(app, config.server_addr).await {
        error!(error = %e, "Server failed");
        return Err(e);
    }

    Ok(())
}
