//! Color parsing for word and background colors.
//!
//! Malformed input never fails: anything that is not exactly `#rrggbb` resolves to
//! opaque black.

use image::Rgba;
use serde::{Deserialize, Serialize};

/// An opaque RGB color resolved from a request string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ResolvedColor {
    pub const BLACK: ResolvedColor = ResolvedColor { r: 0, g: 0, b: 0 };
    pub const WHITE: ResolvedColor = ResolvedColor {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Parses `#rrggbb`. Wrong length, a missing `#` or non-hex digits all yield black.
    pub fn parse(input: &str) -> Self {
        parse_hex(input).unwrap_or(Self::BLACK)
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }

    /// Formats back to lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn parse_hex(input: &str) -> Option<ResolvedColor> {
    let hex = input.strip_prefix('#')?;
    if input.len() != 7 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(ResolvedColor {
        r: u8::from_str_radix(&hex[0..2], 16).ok()?,
        g: u8::from_str_radix(&hex[2..4], 16).ok()?,
        b: u8::from_str_radix(&hex[4..6], 16).ok()?,
    })
}

/// Sum of the four channel values. Used as a cheap stand-in for color equality.
pub fn color_signature(pixel: &Rgba<u8>) -> u32 {
    pixel.0.iter().map(|&c| c as u32).sum()
}
