// Word cloud rendering.
// Scanner + scheduler are the core; canvas, glyphs and render are the glue around them.
// The scan is CPU-bound and runs inside tokio::task::spawn_blocking behind the gate.

pub mod canvas;
pub mod color;
pub mod gate;
pub mod glyphs;
pub mod handlers;
pub mod render;
pub mod scanner;
pub mod scheduler;

#[cfg(test)]
pub mod test_support;

use thiserror::Error;

pub use render::{CloudRequest, RenderContext};

#[derive(Debug, Error)]
pub enum CloudError {
    #[error("width and height must be positive, got {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("canvas {width}x{height} exceeds the {max}px limit")]
    CanvasTooLarge { width: i64, height: i64, max: u32 },

    #[error("word {index} has invalid font size {size}")]
    InvalidFontSize { index: usize, size: f32 },

    #[error("admission gate is closed")]
    GateClosed,

    #[error("render worker failed: {0}")]
    Worker(String),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

impl CloudError {
    /// True for errors caused by the request itself, raised before any drawing.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CloudError::InvalidDimensions { .. }
                | CloudError::CanvasTooLarge { .. }
                | CloudError::InvalidFontSize { .. }
        )
    }
}
