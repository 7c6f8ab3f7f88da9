use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catchlog_backend::config::Config;
use catchlog_backend::db::Repository;
use catchlog_backend::{create_router, shutdown_signal, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting catch log backend");
    tracing::info!("Store URL: {}", config.store.url);
    tracing::info!("Store table: {}", config.store.table);
    tracing::info!("Bind address: {}", config.bind_addr);

    // One store client for the life of the process
    let repo = Repository::new(&config.store)?;
    let state = AppState::new(Arc::new(repo));

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
