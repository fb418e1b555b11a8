//! SkyWatch Server - HTTP gateway for live aircraft and flight metadata

use anyhow::{Context, Result};
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skywatch_core::ReferenceTable;
use skywatch_server::{api, config::Config, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("skywatch_server=debug".parse()?))
        .init();

    tracing::info!("Starting SkyWatch Server...");

    let config = Config::from_env();
    if config.aviationstack_api_key.is_none() {
        tracing::warn!("AVIATIONSTACK_API_KEY not set; /flight and /nearbyairports will fail");
    }

    let reference = ReferenceTable::load(&config.aircraft_table_path).with_context(|| {
        format!(
            "loading aircraft reference table from {}",
            config.aircraft_table_path.display()
        )
    })?;

    let port = config.server_port;
    let state = Arc::new(AppState::new(config, reference)?);

    // Build the app
    let app = api::routes()
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
