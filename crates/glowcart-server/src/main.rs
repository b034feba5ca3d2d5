mod api;
mod catalog;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use crate::catalog::{fetch_catalog, spawn_catalog_refresh, Catalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(glowcart_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = Arc::new(glowcart_client::CatalogClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?);

    // An unreachable backend at startup degrades to an empty catalog; the
    // refresh task will pick up the real one once the backend recovers.
    let initial = match fetch_catalog(&client, &config).await {
        Ok(catalog) => catalog,
        Err(error) => {
            tracing::warn!(%error, "initial catalog fetch failed; starting with empty catalog");
            Catalog::default()
        }
    };
    tracing::info!(
        products = initial.products.len(),
        collections = initial.collections.len(),
        "catalog loaded"
    );

    let state = AppState::new(initial);
    spawn_catalog_refresh(
        Arc::clone(&client),
        Arc::clone(&config),
        state.catalog.clone(),
    );

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "glowcart server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
