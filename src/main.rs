use chumba::config::Config;
use chumba::services::SignalStore;
use chumba::sources::HyperliquidClient;
use chumba::{api, AppState};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chumba=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting Chumba server on {}:{}", config.host, config.port);
    info!(
        "Candles from {} (lookback {}, {} workers, cache TTL {}s)",
        config.hyperliquid_api_url,
        config.lookback,
        config.workers,
        config.cache_ttl.as_secs()
    );

    let source = Arc::new(HyperliquidClient::new(&config.hyperliquid_api_url));
    let signal_store = SignalStore::new(source, config.cache_ttl, config.workers, config.lookback);

    let state = AppState {
        config: config.clone(),
        signal_store,
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Chumba server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
