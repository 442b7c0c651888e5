//! Generate command - Submit a prompt to the generation service

use super::{preview, print_detail, user_error, Session};
use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitegen_core::validate_prompt;
use sitegen_types::GenerateRequest;
use tracing::debug;

pub struct GenerateOptions {
    pub prompt: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub public: bool,
    pub open: bool,
}

pub async fn run(options: GenerateOptions, offline: bool) -> Result<()> {
    // Reject short prompts before touching the network or settings
    validate_prompt(&options.prompt).map_err(user_error)?;

    let mut session = Session::open(offline)?;
    session.require_online()?;

    let mut request = GenerateRequest::new(options.prompt).public(options.public);
    if let Some(title) = options.title.filter(|t| !t.trim().is_empty()) {
        request = request.with_title(title.trim());
    }
    if let Some(description) = options.description.filter(|d| !d.trim().is_empty()) {
        request = request.with_description(description.trim());
    }

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message("Generating your website...");
    bar.enable_steady_tick(std::time::Duration::from_millis(120));

    let mut progress = session.dashboard.subscribe_progress();
    let watcher_bar = bar.clone();
    let watcher = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let snapshot = *progress.borrow_and_update();
            if snapshot.is_generating {
                watcher_bar.set_position(snapshot.progress.round() as u64);
            }
        }
    });

    let result = session.dashboard.generate(request).await;
    watcher.abort();

    let outcome = match result {
        Ok(outcome) => {
            bar.set_position(100);
            bar.finish_and_clear();
            outcome
        }
        Err(e) => {
            bar.abandon_with_message("Generation failed".red().to_string());
            return Err(user_error(e));
        }
    };

    let website = &outcome.artifact;
    session.store.save(website)?;

    if outcome.fallback {
        println!(
            "{} {}",
            "!".yellow().bold(),
            "Generation was incomplete; a starter website was created instead.".yellow()
        );
    } else {
        println!("{} Website generated successfully!", "✓".green());
    }

    debug!("Redirecting to {} in {:?}", outcome.redirect.path, outcome.redirect.after);
    tokio::time::sleep(outcome.redirect.after).await;

    println!();
    print_detail(website);

    let path = preview::write_preview(website, None)?;
    println!();
    println!("  Preview: {}", path.display().to_string().cyan());
    if options.open {
        preview::open(&path);
    }

    session.close()
}
