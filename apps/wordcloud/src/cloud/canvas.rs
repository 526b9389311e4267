//! Per-job pixel buffer. Holds no placement logic.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::cloud::color::{color_signature, ResolvedColor};
use crate::cloud::CloudError;

/// A fixed-size RGBA canvas filled with a background color at creation.
///
/// Dimensions never change after construction. Pixels are mutated in place as words
/// are drawn.
pub struct Canvas {
    image: RgbaImage,
    background: Rgba<u8>,
}

impl Canvas {
    /// Creates a canvas of `width × height` filled with `background`.
    pub fn new(width: u32, height: u32, background: ResolvedColor) -> Result<Self, CloudError> {
        if width == 0 || height == 0 {
            return Err(CloudError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            });
        }
        let background = background.to_rgba();
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, background),
            background,
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    /// Signature the region scanner compares sampled pixels against.
    pub fn background_signature(&self) -> u32 {
        color_signature(&self.background)
    }

    /// Returns the pixel at `(x, y)`. Out-of-bounds reads return transparent black.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        self.image
            .get_pixel_checked(x, y)
            .copied()
            .unwrap_or(Rgba([0, 0, 0, 0]))
    }

    /// Overwrites a pixel. Out-of-bounds writes are clipped.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        if let Some(p) = self.image.get_pixel_mut_checked(x, y) {
            *p = color;
        }
    }

    /// Composites `color` over the existing pixel with the given coverage (0..=255).
    /// Out-of-bounds coordinates are clipped.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>, coverage: u8) {
        if x < 0 || y < 0 || coverage == 0 {
            return;
        }
        let Some(dst) = self.image.get_pixel_mut_checked(x as u32, y as u32) else {
            return;
        };
        let a = (coverage as u32 * color.0[3] as u32 + 127) / 255;
        let inv = 255 - a;
        for c in 0..3 {
            dst.0[c] = ((color.0[c] as u32 * a + dst.0[c] as u32 * inv + 127) / 255) as u8;
        }
        dst.0[3] = (a + (dst.0[3] as u32 * inv + 127) / 255).min(255) as u8;
    }

    /// Paints every pixel with `color`. The recorded background is unchanged.
    pub fn fill(&mut self, color: Rgba<u8>) {
        for p in self.image.pixels_mut() {
            *p = color;
        }
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, CloudError> {
        let mut buf = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        Ok(buf)
    }
}
