pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::cloud::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.asset_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/cloud", post(handlers::handle_generate_cloud))
        .nest_service("/asset", assets)
        .with_state(state)
}
