//! Boulder Server - route recommendations over HTTP

use anyhow::{Context, Result};
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use boulder_server::config::Config;
use boulder_server::state::AppState;
use boulder_server::{api, persistence, seed};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("boulder_server=debug".parse()?))
        .init();

    tracing::info!("Starting Boulder Server...");

    let config = Config::from_env();
    let port = config.server_port;

    let db = persistence::init_database(&config.database_path, config.database_max_connections)
        .await
        .with_context(|| format!("opening database {}", config.database_path))?;
    let state = Arc::new(AppState::with_database(db.clone(), config.clone()));
    state.load_from_database().await?;

    if config.seed_sample_data {
        seed::seed_sample_data(&state).await?;
    }
    let total = persistence::routes::count_routes(db.pool()).await?;
    tracing::info!("Route store ready with {} routes", total);

    // Build the app
    let app = api::routes(&config)
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    db.close().await;
    Ok(())
}
