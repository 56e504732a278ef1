use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use medipass_backend::config::{AppConfig, APP_NAME};
use medipass_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    info!("Starting {} backend", APP_NAME);

    let state = initialize_backend(&config)?;
    let app = create_router(state, &config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
