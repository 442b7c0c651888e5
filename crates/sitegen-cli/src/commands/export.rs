//! Export command - Download a website as an archive or single file

use super::{user_error, Session, Target};
use anyhow::{Context, Result};
use colored::Colorize;
use sitegen_core::inspect::format_file_size;
use sitegen_core::{single_file_download, ArchiveBuilder, EntryOrigin, SingleFile};
use std::path::PathBuf;

pub async fn run(
    target: Target,
    out_dir: PathBuf,
    single: Option<SingleFile>,
    offline: bool,
) -> Result<()> {
    let session = Session::open(offline)?;
    let website = session.artifact(&target, false).await?;

    if let Some(file) = single {
        let (name, contents) = single_file_download(&website, file);
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("Failed to create directory {:?}", out_dir))?;
        let path = out_dir.join(&name);
        std::fs::write(&path, &contents)
            .with_context(|| format!("Failed to write {:?}", path))?;
        println!(
            "{} {} file downloaded: {} ({})",
            "✓".green(),
            file.extension().to_uppercase(),
            path.display().to_string().cyan(),
            format_file_size(contents.len() as u64)
        );
        return Ok(());
    }

    let builder = ArchiveBuilder::new();
    let plan = builder.plan(&website).map_err(user_error)?;
    let archive = builder.pack(&plan).map_err(user_error)?;
    let path = archive.write_to(&out_dir).map_err(user_error)?;

    println!(
        "{} ZIP file downloaded: {} ({})",
        "✓".green(),
        path.display().to_string().cyan(),
        format_file_size(archive.bytes.len() as u64)
    );
    for entry in &plan.entries {
        let note = match entry.origin {
            EntryOrigin::Content => "".normal(),
            EntryOrigin::Synthesized => "(generated)".dimmed(),
        };
        println!("  {} {}", entry.path, note);
    }
    Ok(())
}
