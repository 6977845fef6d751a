use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hatgame::{
    api,
    config::ServerConfig,
    state::AppState,
    store::{HatStore, MemoryStore},
};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hatgame=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting hat game...");

    let config = ServerConfig::from_env();

    let store = match &config.data_file {
        Some(path) => MemoryStore::open(path)
            .await
            .unwrap_or_else(|e| panic!("Failed to open store {}: {}", path.display(), e)),
        None => {
            tracing::warn!("HAT_DATA_FILE not set, hats are kept in memory only");
            MemoryStore::new()
        }
    };
    tracing::info!("{} hats in store", store.hat_count().await);

    let state = Arc::new(AppState::with_parts(
        Arc::new(store),
        AppState::random_from_seed(config.rng_seed),
    ));

    let app = api::router(state);

    tracing::info!("Listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .unwrap();
    axum::serve(listener, app).await.unwrap();
}
