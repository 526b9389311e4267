//! Font-free `GlyphService` double for tests.

use std::sync::Mutex;

use crate::cloud::canvas::Canvas;
use crate::cloud::color::ResolvedColor;
use crate::cloud::glyphs::{GlyphError, GlyphService};
use crate::cloud::scheduler::baseline_offset;

/// Every character is `advance × size` wide; drawing fills the word's box solid.
pub struct BlockGlyphs {
    pub advance: f32,
    /// Texts for which `draw` fails.
    pub fail_on: Vec<String>,
    pub measured: Mutex<Vec<String>>,
}

impl BlockGlyphs {
    pub fn new(advance: f32) -> Self {
        Self {
            advance,
            fail_on: Vec::new(),
            measured: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on.push(text.to_string());
        self
    }

    pub fn measured(&self) -> Vec<String> {
        self.measured.lock().unwrap().clone()
    }
}

impl GlyphService for BlockGlyphs {
    fn measure(&self, size: f32, text: &str) -> f32 {
        self.measured.lock().unwrap().push(text.to_string());
        text.chars().count() as f32 * size * self.advance
    }

    fn draw(
        &self,
        canvas: &mut Canvas,
        size: f32,
        color: ResolvedColor,
        text: &str,
        origin: (i64, i64),
    ) -> Result<(), GlyphError> {
        if self.fail_on.iter().any(|t| t == text) {
            return Err(GlyphError::Raster(format!("refusing to draw {text:?}")));
        }
        let width = (text.chars().count() as f32 * size * self.advance).round() as i64;
        let top = origin.1 - baseline_offset(size);
        for x in origin.0..origin.0 + width {
            for y in top..top + size as i64 {
                canvas.blend_pixel(x, y, color.to_rgba(), 255);
            }
        }
        Ok(())
    }
}
