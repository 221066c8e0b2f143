use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vigil::config::Config;
use vigil::services::{
    build_scorer, load_universe, BatchAnalyzer, ResultCache, SnapshotFile,
};
use vigil::sources::MexcClient;
use vigil::websocket::{spawn_snapshot_pump, ClientHub};
use vigil::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigil=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting Vigil server on {}:{}", config.host, config.port);

    // Resolve the symbol universe once; a provider outage here is not
    // fatal, the server just starts with nothing to analyze.
    let provider = Arc::new(MexcClient::new(&config));
    let universe = load_universe(provider.as_ref(), &config).await;

    // Seed the result cache and restore the previous run's snapshot so
    // viewers see data before the first pass completes.
    let (cache, _rx) = ResultCache::new(universe.symbols.clone());
    let snapshot_file = SnapshotFile::new(&config.snapshot_path);
    if let Some(saved) = snapshot_file.load() {
        let restored = cache.preload(saved);
        info!("Restored {} signals from previous snapshot", restored);
    }

    // Start the rotating analysis loop.
    let scorer = build_scorer(&config);
    let analyzer = BatchAnalyzer::new(
        provider,
        scorer,
        cache.clone(),
        snapshot_file,
        universe,
        &config,
    );
    tokio::spawn(analyzer.run());

    // Fan published snapshots out to WebSocket viewers.
    let hub = ClientHub::new();
    spawn_snapshot_pump(hub.clone(), cache.subscribe());

    // Create application state
    let state = AppState {
        config: config.clone(),
        cache,
        hub,
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = axum::Router::new()
        .merge(vigil::api::router())
        .route("/ws", axum::routing::get(vigil::websocket::ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Vigil server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
