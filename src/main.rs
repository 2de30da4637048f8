use std::{sync::Arc, time::Duration};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use watchlist_api::{
    api::{create_router, AppState},
    config::{Config, StorageBackend},
    db::{create_pool, InMemoryWatchlistStore, PgWatchlistStore, WatchlistStore},
    services::completion::GeminiProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchlist_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn WatchlistStore> = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url).await?;
            tracing::info!("Connected to PostgreSQL");
            Arc::new(PgWatchlistStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(InMemoryWatchlistStore::new())
        }
    };

    let provider = GeminiProvider::new(
        config.gemini_api_key.clone(),
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
        Duration::from_secs(config.completion_timeout_secs),
    )?;

    let state = AppState::new(store, Arc::new(provider), config.app_env);
    let app = create_router(state, &config.allowed_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        address = %addr,
        environment = ?config.app_env,
        model = %config.gemini_model,
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
