use anyhow::Context;

use instawrite_api::app::{self, AppServices};
use instawrite_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    instawrite_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;

    let services = AppServices::from_config(&config)
        .await
        .context("failed to open post store")?;
    tracing::info!(backend = services.backend(), "post store ready");

    let app = app::build_app(&config.jwt_secret, services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
