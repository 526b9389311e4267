use std::sync::Arc;

use crate::cloud::RenderContext;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Font, admission gate and render defaults. Built once at startup.
    pub render: Arc<RenderContext>,
    pub config: Config,
}
