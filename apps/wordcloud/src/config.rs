use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// TrueType/OpenType font used for every job.
    pub font_path: PathBuf,
    /// Directory served under `/asset`.
    pub asset_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
    /// Open the web UI in the system browser once the listener is bound.
    pub open_browser: bool,
    /// Default sampling stride when a request does not set one.
    pub quality: u32,
    pub max_canvas_dimension: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            font_path: lookup("FONT_PATH")
                .map(PathBuf::from)
                .context("Required environment variable 'FONT_PATH' is not set")?,
            asset_dir: lookup("ASSET_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("asset")),
            port: lookup("PORT")
                .unwrap_or_else(|| "8765".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            open_browser: parse_flag(lookup("OPEN_BROWSER").as_deref())
                .context("OPEN_BROWSER must be true/false")?,
            quality: lookup("QUALITY")
                .unwrap_or_else(|| "10".to_string())
                .parse::<u32>()
                .context("QUALITY must be a positive integer")?,
            max_canvas_dimension: lookup("MAX_CANVAS_DIMENSION")
                .unwrap_or_else(|| "4096".to_string())
                .parse::<u32>()
                .context("MAX_CANVAS_DIMENSION must be a positive integer")?,
        })
    }
}

fn parse_flag(value: Option<&str>) -> Result<bool> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("0") | Some("false") | Some("no") => Ok(false),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some(other) => anyhow::bail!("unrecognised flag value '{other}'"),
    }
}
