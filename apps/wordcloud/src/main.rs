mod browser;
mod cloud;
mod config;
mod errors;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cloud::RenderContext;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting wordcloud v{}", env!("CARGO_PKG_VERSION"));

    // Parse the font once; every job shares it read-only
    let render = Arc::new(RenderContext::from_config(&config)?);
    info!("Default sampling stride: {}", config.quality);

    let state = AppState {
        render,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {addr}");

    if config.open_browser {
        let url = format!("http://localhost:{}/asset/", config.port);
        if let Err(e) = browser::open_url(&url) {
            warn!("Could not open browser: {e:#}");
        }
    }

    axum::serve(listener, app).await?;

    Ok(())
}
