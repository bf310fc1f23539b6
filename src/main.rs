// News API Server

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use news_api::{api::create_news_router, app_state::AppState, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize application state
    let app_state = AppState::new(config).await?;
    let addr = app_state.config.server_address();

    let app = create_news_router(app_state);

    let listener = TcpListener::bind(&addr).await?;
    info!("News API listening on http://{}", addr);
    info!("Endpoint documentation at http://{}/api", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("News API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
