//! Glyph measurement and rasterization.
//!
//! `GlyphService` is the seam between layout and fonts. `RenderContext` holds an
//! `Arc<dyn GlyphService>`; production uses `FontdueGlyphs`, tests use a block-glyph
//! double that needs no font file.

use std::path::Path;

use anyhow::Context;
use fontdue::{Font, FontSettings};
use image::Rgba;
use thiserror::Error;

use crate::cloud::canvas::Canvas;
use crate::cloud::color::ResolvedColor;

#[derive(Debug, Error)]
pub enum GlyphError {
    #[error("text origin ({x}, {y}) lies outside the {width}x{height} canvas")]
    OriginOutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("glyph rasterization failed: {0}")]
    Raster(String),
}

/// Measures and draws text at a pixel size.
pub trait GlyphService: Send + Sync {
    /// Advance width of `text` at `size` pixels. Deterministic.
    fn measure(&self, size: f32, text: &str) -> f32;

    /// Draws `text` with its baseline starting at `origin`. Mutates only `canvas`.
    fn draw(
        &self,
        canvas: &mut Canvas,
        size: f32,
        color: ResolvedColor,
        text: &str,
        origin: (i64, i64),
    ) -> Result<(), GlyphError>;
}

// ────────────────────────────────────────────────────────────────────────────
// fontdue backend
// ────────────────────────────────────────────────────────────────────────────

/// A TrueType/OpenType font parsed once at startup and shared read-only across jobs.
pub struct FontdueGlyphs {
    font: Font,
}

impl FontdueGlyphs {
    pub fn from_bytes(data: &[u8]) -> anyhow::Result<Self> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| anyhow::anyhow!("failed to parse font: {e}"))?;
        Ok(Self { font })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read font file {}", path.display()))?;
        Self::from_bytes(&data).with_context(|| format!("invalid font file {}", path.display()))
    }

    pub fn family_name(&self) -> Option<&str> {
        self.font.name()
    }
}

impl GlyphService for FontdueGlyphs {
    fn measure(&self, size: f32, text: &str) -> f32 {
        let mut width = 0.0;
        let mut prev: Option<char> = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                width += self.font.horizontal_kern(p, ch, size).unwrap_or(0.0);
            }
            width += self.font.metrics(ch, size).advance_width;
            prev = Some(ch);
        }
        width
    }

    fn draw(
        &self,
        canvas: &mut Canvas,
        size: f32,
        color: ResolvedColor,
        text: &str,
        origin: (i64, i64),
    ) -> Result<(), GlyphError> {
        let (width, height) = (canvas.width(), canvas.height());
        if origin.0 < 0 || origin.0 >= width as i64 || origin.1 < 0 || origin.1 > height as i64 {
            return Err(GlyphError::OriginOutOfBounds {
                x: origin.0,
                y: origin.1,
                width,
                height,
            });
        }

        let rgba: Rgba<u8> = color.to_rgba();
        let mut pen_x = origin.0 as f32;
        let mut prev: Option<char> = None;

        for ch in text.chars() {
            if let Some(p) = prev {
                pen_x += self.font.horizontal_kern(p, ch, size).unwrap_or(0.0);
            }
            let (metrics, bitmap) = self.font.rasterize(ch, size);
            if bitmap.len() != metrics.width * metrics.height {
                return Err(GlyphError::Raster(format!(
                    "bitmap for {ch:?} has {} bytes, expected {}x{}",
                    bitmap.len(),
                    metrics.width,
                    metrics.height
                )));
            }

            let left = (pen_x + metrics.xmin as f32).round() as i64;
            let top = origin.1 - metrics.height as i64 - metrics.ymin as i64;
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let coverage = bitmap[row * metrics.width + col];
                    canvas.blend_pixel(left + col as i64, top + row as i64, rgba, coverage);
                }
            }

            pen_x += metrics.advance_width;
            prev = Some(ch);
        }
        Ok(())
    }
}
