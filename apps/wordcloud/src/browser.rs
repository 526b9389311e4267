//! Opens the web UI in the system browser.

use std::process::Command;

use anyhow::{bail, Context, Result};

/// Launcher program and leading arguments for the current platform.
fn launcher() -> Option<(&'static str, &'static [&'static str])> {
    if cfg!(target_os = "windows") {
        Some(("cmd", &["/C", "start", ""]))
    } else if cfg!(target_os = "macos") {
        Some(("open", &[]))
    } else if cfg!(target_os = "linux") {
        Some(("xdg-open", &[]))
    } else {
        None
    }
}

/// Spawns the platform browser launcher for `url` without waiting for it.
pub fn open_url(url: &str) -> Result<()> {
    let Some((program, args)) = launcher() else {
        bail!(
            "opening a browser on {} is unsupported, open {url} manually",
            std::env::consts::OS
        );
    };
    Command::new(program)
        .args(args)
        .arg(url)
        .spawn()
        .with_context(|| format!("failed to run {program}"))?;
    Ok(())
}
