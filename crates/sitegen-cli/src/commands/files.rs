//! Files and code commands - Explore a website's source files

use super::{Session, Target};
use anyhow::{Context, Result};
use colored::Colorize;
use sitegen_core::{
    icon_for, CodeViewer, ExplorerState, FileTree, LineKind, SiteContent, TreeLine,
};
use std::path::PathBuf;
use tracing::warn;

/// Print the file tree of a website
pub async fn tree(
    target: Target,
    expand: Vec<String>,
    collapse: Vec<String>,
    select: Option<String>,
    offline: bool,
) -> Result<()> {
    let session = Session::open(offline)?;
    let website = session.artifact(&target, false).await?;

    let content = match SiteContent::ingest(&website) {
        Ok(content) => content,
        Err(e) => {
            warn!("Cannot list files of {}: {}", website.id, e);
            println!("{}", "Unable to read the project files of this website.".yellow());
            return Ok(());
        }
    };

    let tree = FileTree::from_content(&content);
    let mut state = ExplorerState::new();
    for folder in expand {
        if !state.is_expanded(&folder) {
            state.toggle(&folder);
        }
    }
    for folder in collapse {
        if state.is_expanded(&folder) {
            state.toggle(&folder);
        }
    }
    if let Some(path) = select {
        state.select(path);
    }

    println!(
        "{} {}",
        website.title.bold(),
        format!("({})", content.classification()).dimmed()
    );
    for line in tree.lines(&state) {
        println!("{}", render_line(&line));
    }
    Ok(())
}

/// Print one file's source, or save it on its own
pub async fn code(
    target: Target,
    path: Option<String>,
    save: Option<PathBuf>,
    offline: bool,
) -> Result<()> {
    let session = Session::open(offline)?;
    let website = session.artifact(&target, false).await?;

    let content = SiteContent::ingest(&website)
        .with_context(|| format!("Unable to read the project files of {}", website.id))?;
    let mut viewer = CodeViewer::new(&content);
    if let Some(path) = &path {
        if let Err(e) = viewer.select(path) {
            eprintln!("{} {}", "Available files:".dimmed(), viewer.paths().join(", "));
            return Err(e.into());
        }
    }

    match save {
        Some(dir) => {
            let (name, contents) = viewer.download();
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory {:?}", dir))?;
            let out = dir.join(&name);
            std::fs::write(&out, contents)
                .with_context(|| format!("Failed to write {:?}", out))?;
            println!(
                "{} Saved {} ({})",
                "✓".green(),
                out.display().to_string().cyan(),
                viewer.current_language()
            );
        }
        // Raw contents on stdout so they can be piped or copied
        None => print!("{}", viewer.current_source()),
    }
    Ok(())
}

fn render_line(line: &TreeLine) -> String {
    let indent = "  ".repeat(line.depth + 1);
    match line.kind {
        LineKind::Folder { expanded: true, .. } => {
            format!("{}▾ 📁 {}/", indent, line.name.bold())
        }
        LineKind::Folder { hidden, .. } if hidden > 0 => format!(
            "{}▸ 📁 {}/ {}",
            indent,
            line.name.bold(),
            format!("({} files)", hidden).dimmed()
        ),
        LineKind::Folder { .. } => format!("{}▸ 📁 {}/", indent, line.name.bold()),
        LineKind::File => {
            let label = format!("{} {}", icon_for(&line.path), line.name);
            if line.selected {
                format!("{}{}", indent, label.cyan().bold())
            } else {
                format!("{}{}", indent, label)
            }
        }
    }
}
