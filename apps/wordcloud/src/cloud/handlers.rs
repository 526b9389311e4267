//! Axum route handlers for the word cloud API.

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::cloud::render::CloudRequest;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PlacementView {
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub size: f32,
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct CloudResponse {
    /// Base64-encoded PNG.
    pub data: String,
    pub width: u32,
    pub height: u32,
    pub placed: usize,
    pub requested: usize,
    pub placements: Vec<PlacementView>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /cloud
///
/// Renders the words in order onto a fresh canvas and returns the PNG. Running out of
/// room is not an error: the response simply reports fewer placed than requested.
pub async fn handle_generate_cloud(
    State(state): State<AppState>,
    Json(request): Json<CloudRequest>,
) -> Result<Json<CloudResponse>, AppError> {
    let rendered = state.render.render(request).await?;
    let report = rendered.report;

    Ok(Json(CloudResponse {
        data: STANDARD.encode(&rendered.png),
        width: rendered.width,
        height: rendered.height,
        placed: report.placed(),
        requested: report.requested,
        placements: report
            .placements
            .into_iter()
            .map(|p| PlacementView {
                text: p.text,
                x: p.x,
                y: p.y,
                size: p.size,
                color: p.color.to_hex(),
            })
            .collect(),
    }))
}
