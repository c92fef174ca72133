use anyhow::Context;

use clientele_api::app::{build_app, build_services};
use clientele_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    clientele_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;

    let services = build_services(&config.store)
        .await
        .context("failed to initialize document store")?;
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
