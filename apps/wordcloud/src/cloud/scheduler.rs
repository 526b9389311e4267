//! Strict input-order greedy layout.
//!
//! Words are processed exactly in the order given. Each one is measured, a blank region
//! is searched for, and on success the glyphs are drawn straight into the canvas so the
//! next search sees them as occupied. The first word that finds no region ends the run;
//! nothing after it is attempted. There is no reordering and no backtracking.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cloud::canvas::Canvas;
use crate::cloud::color::ResolvedColor;
use crate::cloud::glyphs::GlyphService;
use crate::cloud::scanner::{find_blank_region, Quality};

/// Distance from the top of a word's box down to where its baseline is drawn.
///
/// Three quarters of the font size. A fixed heuristic, not a font metric.
pub fn baseline_offset(size: f32) -> i64 {
    (size * 3.0 / 4.0) as i64
}

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

/// One word to lay out.
#[derive(Debug, Clone, PartialEq)]
pub struct WordSpec {
    pub text: String,
    /// Font size in pixels. Also used as the box height.
    pub size: f32,
    pub color: ResolvedColor,
}

impl WordSpec {
    /// Builds a word, resolving `color` (malformed strings become black).
    pub fn new(text: impl Into<String>, size: f32, color: &str) -> Self {
        Self {
            text: text.into(),
            size,
            color: ResolvedColor::parse(color),
        }
    }

    /// Box the region scanner must find: rounded advance width by truncated size.
    pub fn measure(&self, glyphs: &dyn GlyphService) -> (u32, u32) {
        let width = glyphs.measure(self.size, &self.text).round().max(1.0) as u32;
        let height = (self.size as u32).max(1);
        (width, height)
    }
}

/// A word that was found a region and drawn. `x`/`y` is the region's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub text: String,
    pub size: f32,
    pub color: ResolvedColor,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Outcome of one layout run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutReport {
    /// Successful placements, in input order.
    pub placements: Vec<Placement>,
    pub requested: usize,
    /// Indices of words that had a region but failed to draw.
    pub draw_failures: Vec<usize>,
    /// Index of the word that found no region, if the run was cut short.
    pub exhausted_at: Option<usize>,
}

impl LayoutReport {
    pub fn placed(&self) -> usize {
        self.placements.len()
    }

    pub fn unplaced(&self) -> usize {
        self.requested - self.placements.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// Lays out `words` onto `canvas` in order, stopping at the first word with no room.
///
/// A draw failure is logged and that word is skipped; the loop carries on. Only an
/// exhausted search truncates the list.
pub fn layout_words<R: Rng>(
    canvas: &mut Canvas,
    words: &[WordSpec],
    glyphs: &dyn GlyphService,
    quality: Quality,
    rng: &mut R,
) -> LayoutReport {
    let mut report = LayoutReport {
        requested: words.len(),
        ..Default::default()
    };
    let background = canvas.background_signature();

    for (i, word) in words.iter().enumerate() {
        debug!(text = %word.text, size = word.size, color = %word.color.to_hex(), "placing word");

        let (size_x, size_y) = word.measure(glyphs);
        let Some((x, y)) = find_blank_region(canvas, size_x, size_y, background, quality, rng)
        else {
            info!("no room left, {} of {} words finished", i, words.len());
            report.exhausted_at = Some(i);
            break;
        };

        let origin = (x as i64, y as i64 + baseline_offset(word.size));
        if let Err(e) = glyphs.draw(canvas, word.size, word.color, &word.text, origin) {
            warn!(text = %word.text, "failed to draw word: {e}");
            report.draw_failures.push(i);
            continue;
        }

        debug!(text = %word.text, x, y, "word placed");
        report.placements.push(Placement {
            text: word.text.clone(),
            size: word.size,
            color: word.color,
            x,
            y,
            width: size_x,
            height: size_y,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::test_support::BlockGlyphs;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn white(width: u32, height: u32) -> Canvas {
        Canvas::new(width, height, ResolvedColor::WHITE).unwrap()
    }

    fn overlaps(a: &Placement, b: &Placement) -> bool {
        a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
    }

    // ── measurement & anchoring ─────────────────────────────────────────────

    #[test]
    fn test_measure_uses_size_as_height() {
        let glyphs = BlockGlyphs::new(0.5);
        let word = WordSpec::new("abcde", 20.0, "#000000");
        assert_eq!(word.measure(&glyphs), (50, 20));
    }

    #[test]
    fn test_measure_never_returns_zero_box() {
        let glyphs = BlockGlyphs::new(0.5);
        let word = WordSpec::new("", 0.5, "#000000");
        assert_eq!(word.measure(&glyphs), (1, 1));
    }

    #[test]
    fn test_baseline_offset_is_three_quarters_truncated() {
        assert_eq!(baseline_offset(20.0), 15);
        assert_eq!(baseline_offset(10.0), 7);
        assert_eq!(baseline_offset(42.0), 31);
    }

    #[test]
    fn test_word_color_falls_back_to_black() {
        assert_eq!(WordSpec::new("a", 10.0, "red").color, ResolvedColor::BLACK);
        assert_eq!(
            WordSpec::new("a", 10.0, "#00ff00").color,
            ResolvedColor { r: 0, g: 255, b: 0 }
        );
    }

    // ── scenarios ───────────────────────────────────────────────────────────

    #[test]
    fn test_word_filling_whole_canvas_is_not_placed() {
        let mut canvas = white(200, 100);
        let before = canvas.as_image().clone();
        let glyphs = BlockGlyphs::new(0.5);
        // 4 chars × 100 × 0.5 = 200 wide, 100 tall
        let words = vec![WordSpec::new("wide", 100.0, "#000000")];
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let report = layout_words(&mut canvas, &words, &glyphs, Quality::FINEST, &mut rng);

        assert_eq!(report.placed(), 0);
        assert_eq!(report.unplaced(), 1);
        assert_eq!(report.exhausted_at, Some(0));
        assert_eq!(canvas.as_image(), &before, "canvas must be untouched");
    }

    #[test]
    fn test_three_small_words_are_placed_without_overlap() {
        let mut canvas = white(500, 500);
        let glyphs = BlockGlyphs::new(0.5);
        let words = vec![
            WordSpec::new("alpha", 20.0, "#000000"),
            WordSpec::new("bravo", 20.0, "#ff0000"),
            WordSpec::new("delta", 20.0, "#0000ff"),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let report = layout_words(&mut canvas, &words, &glyphs, Quality::FINEST, &mut rng);

        assert_eq!(report.placed(), 3);
        assert_eq!(report.exhausted_at, None);
        let p = &report.placements;
        for (a, b) in [(0, 1), (0, 2), (1, 2)] {
            assert!(
                !overlaps(&p[a], &p[b]),
                "{:?} overlaps {:?}",
                p[a],
                p[b]
            );
        }
        let texts: Vec<_> = p.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["alpha", "bravo", "delta"]);
    }

    #[test]
    fn test_placed_word_is_drawn_inside_its_box() {
        let mut canvas = white(100, 60);
        let glyphs = BlockGlyphs::new(0.5);
        let words = vec![WordSpec::new("ab", 20.0, "#000000")];
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let report = layout_words(&mut canvas, &words, &glyphs, Quality::FINEST, &mut rng);
        let p = &report.placements[0];

        assert_eq!(canvas.pixel(p.x, p.y).0, [0, 0, 0, 255]);
        assert_eq!(canvas.pixel(p.x + p.width - 1, p.y + p.height - 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_failure_stops_remaining_words() {
        let mut canvas = white(200, 100);
        let glyphs = BlockGlyphs::new(0.5);
        let words = vec![
            WordSpec::new("ok", 10.0, "#000000"),
            WordSpec::new("enormous", 300.0, "#000000"),
            WordSpec::new("never", 10.0, "#000000"),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let report = layout_words(&mut canvas, &words, &glyphs, Quality::FINEST, &mut rng);

        assert_eq!(report.placed(), 1);
        assert_eq!(report.exhausted_at, Some(1));
        assert_eq!(report.unplaced(), 2);
        assert_eq!(
            glyphs.measured(),
            vec!["ok".to_string(), "enormous".to_string()],
            "words after the failure must not even be measured"
        );
    }

    #[test]
    fn test_draw_failure_skips_only_that_word() {
        let mut canvas = white(300, 200);
        let glyphs = BlockGlyphs::new(0.5).failing_on("boom");
        let words = vec![
            WordSpec::new("one", 10.0, "#000000"),
            WordSpec::new("boom", 10.0, "#000000"),
            WordSpec::new("three", 10.0, "#000000"),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let report = layout_words(&mut canvas, &words, &glyphs, Quality::FINEST, &mut rng);

        assert_eq!(report.draw_failures, vec![1]);
        assert_eq!(report.exhausted_at, None);
        let texts: Vec<_> = report.placements.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "three"]);
    }

    #[test]
    fn test_canvas_fills_up_and_truncates() {
        let mut canvas = white(60, 30);
        let glyphs = BlockGlyphs::new(0.5);
        // 40x20 boxes: after the first one lands no second one can fit
        let words: Vec<_> = (0..5)
            .map(|_| WordSpec::new("abcd", 20.0, "#000000"))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let report = layout_words(&mut canvas, &words, &glyphs, Quality::FINEST, &mut rng);

        assert_eq!(report.placed(), 1);
        assert_eq!(report.exhausted_at, Some(1));
    }

    #[test]
    fn test_repeat_runs_keep_placed_count() {
        let glyphs = BlockGlyphs::new(0.5);
        let words: Vec<_> = ["go", "rust", "zig", "nim"]
            .iter()
            .map(|t| WordSpec::new(*t, 16.0, "#333333"))
            .collect();

        let mut origins = Vec::new();
        for seed in 0..4 {
            let mut canvas = white(400, 300);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let report = layout_words(&mut canvas, &words, &glyphs, Quality::NORMAL, &mut rng);
            assert_eq!(report.placed(), 4);
            origins.push((report.placements[0].x, report.placements[0].y));
        }
        origins.dedup();
        assert!(origins.len() > 1, "different seeds should move words around");
    }

    #[test]
    fn test_empty_word_list_places_nothing() {
        let mut canvas = white(50, 50);
        let glyphs = BlockGlyphs::new(0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let report = layout_words(&mut canvas, &[], &glyphs, Quality::NORMAL, &mut rng);
        assert_eq!(report.requested, 0);
        assert_eq!(report.placed(), 0);
        assert_eq!(report.exhausted_at, None);
    }
}
