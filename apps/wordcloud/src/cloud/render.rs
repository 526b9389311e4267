//! Render jobs: validate the request, wait for the gate, then scan and draw off the executor.
//!
//! `RenderContext` is built once at startup and shared through `AppState`. It owns the
//! parsed font and the admission gate; each job gets a fresh canvas and RNG.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::cloud::canvas::Canvas;
use crate::cloud::color::ResolvedColor;
use crate::cloud::gate::AdmissionGate;
use crate::cloud::glyphs::{FontdueGlyphs, GlyphService};
use crate::cloud::scanner::Quality;
use crate::cloud::scheduler::{layout_words, LayoutReport, WordSpec};
use crate::cloud::CloudError;
use crate::config::Config;

// ────────────────────────────────────────────────────────────────────────────
// Request
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct WordRequest {
    pub text: String,
    pub size: f32,
    #[serde(default)]
    pub color: String,
}

/// A render request as received from the caller. Validated into a `RenderJob`.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudRequest {
    #[serde(default)]
    pub content: Vec<WordRequest>,
    pub width: i64,
    pub height: i64,
    /// Background color. Absent or empty means white.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub quality: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// A validated job, ready for the blocking phase.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub id: Uuid,
    pub width: u32,
    pub height: u32,
    pub background: ResolvedColor,
    pub words: Vec<WordSpec>,
    pub quality: Quality,
    pub seed: Option<u64>,
}

/// The encoded image plus what was placed.
#[derive(Debug, Clone)]
pub struct RenderedCloud {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub report: LayoutReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Context
// ────────────────────────────────────────────────────────────────────────────

pub struct RenderContext {
    glyphs: Arc<dyn GlyphService>,
    gate: AdmissionGate,
    default_quality: Quality,
    max_dimension: u32,
}

impl RenderContext {
    pub fn new(glyphs: Arc<dyn GlyphService>, default_quality: Quality, max_dimension: u32) -> Self {
        Self {
            glyphs,
            gate: AdmissionGate::new(),
            default_quality,
            max_dimension,
        }
    }

    /// Loads the configured font. Called once at startup.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let font = FontdueGlyphs::load(&config.font_path)?;
        info!(
            "Font loaded: {} ({})",
            font.family_name().unwrap_or("unnamed"),
            config.font_path.display()
        );
        Ok(Self::new(
            Arc::new(font),
            Quality::new(config.quality),
            config.max_canvas_dimension,
        ))
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Checks dimensions and word sizes before anything is drawn.
    pub fn validate(&self, request: CloudRequest) -> Result<RenderJob, CloudError> {
        let (width, height) = (request.width, request.height);
        if width <= 0 || height <= 0 {
            return Err(CloudError::InvalidDimensions { width, height });
        }
        let max = self.max_dimension as i64;
        if width > max || height > max {
            return Err(CloudError::CanvasTooLarge {
                width,
                height,
                max: self.max_dimension,
            });
        }
        if let Some((index, w)) = request
            .content
            .iter()
            .enumerate()
            .find(|(_, w)| !w.size.is_finite() || w.size <= 0.0)
        {
            return Err(CloudError::InvalidFontSize {
                index,
                size: w.size,
            });
        }

        let background = match request.color.as_deref() {
            None | Some("") => ResolvedColor::WHITE,
            Some(c) => ResolvedColor::parse(c),
        };

        Ok(RenderJob {
            id: Uuid::new_v4(),
            width: width as u32,
            height: height as u32,
            background,
            words: request
                .content
                .into_iter()
                .map(|w| WordSpec::new(w.text, w.size, &w.color))
                .collect(),
            quality: request
                .quality
                .map(Quality::new)
                .unwrap_or(self.default_quality),
            seed: request.seed,
        })
    }

    /// Runs one job end to end: validate, wait for the gate, then lay out and encode on
    /// a blocking worker. The permit moves into the worker and is released when it ends.
    pub async fn render(self: &Arc<Self>, request: CloudRequest) -> Result<RenderedCloud, CloudError> {
        let job = self.validate(request)?;
        info!(
            job_id = %job.id,
            "start: {} words on {}x{}",
            job.words.len(),
            job.width,
            job.height
        );

        let permit = self.gate.acquire().await?;
        let ctx = Arc::clone(self);
        let rendered = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            ctx.render_blocking(&job)
        })
        .await
        .map_err(|e| CloudError::Worker(e.to_string()))??;

        Ok(rendered)
    }

    /// CPU-bound part of a job. Must not run on the async executor.
    pub fn render_blocking(&self, job: &RenderJob) -> Result<RenderedCloud, CloudError> {
        let mut canvas = Canvas::new(job.width, job.height, job.background)?;
        let mut rng = match job.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };

        let report = layout_words(
            &mut canvas,
            &job.words,
            self.glyphs.as_ref(),
            job.quality,
            &mut rng,
        );
        let png = canvas.encode_png()?;

        info!(
            job_id = %job.id,
            "done: placed {} of {} words",
            report.placed(),
            report.requested
        );
        Ok(RenderedCloud {
            png,
            width: job.width,
            height: job.height,
            report,
        })
    }
}
