//! Preview command - Render a website into a standalone HTML document

use super::{Session, Target};
use crate::config::SettingsManager;
use anyhow::{Context, Result};
use colored::Colorize;
use sitegen_core::preview::{render, PreviewSource};
use sitegen_core::sanitize_filename;
use sitegen_types::Artifact;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub async fn run(target: Target, out: Option<PathBuf>, open_browser: bool, offline: bool) -> Result<()> {
    let session = Session::open(offline)?;
    let website = session.artifact(&target, true).await?;

    let path = write_preview(&website, out)?;
    println!("{} Preview written to {}", "✓".green(), path.display().to_string().cyan());

    if open_browser {
        open(&path);
    }
    Ok(())
}

/// Render the preview document and save it, by default under
/// `~/.sitegen/previews/`
pub fn write_preview(website: &Artifact, out: Option<PathBuf>) -> Result<PathBuf> {
    let preview = render(website);
    match preview.source {
        PreviewSource::Template => println!(
            "  {}",
            "Showing a template preview; the page could not be converted.".dimmed()
        ),
        PreviewSource::Unavailable => println!(
            "  {}",
            "Unable to generate live preview for this project.".yellow()
        ),
        PreviewSource::Verbatim | PreviewSource::Transpiled => {}
    }

    let path = match out {
        Some(path) => path,
        None => {
            let mut stem = sanitize_filename(&website.id);
            if stem.is_empty() {
                stem = "preview".to_string();
            }
            SettingsManager::sitegen_home()?
                .join("previews")
                .join(format!("{}.html", stem))
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    std::fs::write(&path, &preview.document)
        .with_context(|| format!("Failed to write preview to {:?}", path))?;

    info!("Preview for {} written to {:?}", website.id, path);
    Ok(path)
}

/// Open a file in the default browser. Failure is reported, not fatal.
pub fn open(path: &Path) {
    let target = path.display().to_string();
    if let Err(e) = webbrowser::open(&target) {
        warn!("Could not open browser: {}", e);
        println!("  {} {}", "Open manually:".dimmed(), target);
    }
}
