//! Config command - Manage CLI configuration

use crate::config::{normalize_server_url, SettingsManager, API_URL_ENV};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use sitegen_types::{Settings, Theme, VisibilityFilter};

/// Show current configuration
pub async fn show() -> Result<()> {
    let settings = SettingsManager::load().context("Failed to load settings")?;

    println!("{}", "Sitegen Configuration".bold().underline());
    println!();

    println!("{}", "Server Settings:".cyan().bold());
    println!("  API URL: {}", settings.server_url);
    if std::env::var(API_URL_ENV).is_ok() {
        println!("  {}", format!("(overridden by {})", API_URL_ENV).dimmed());
    }
    println!("  Timeout: {}s", settings.request_timeout_secs);
    println!();

    let prefs = &settings.preferences;
    println!("{}", "Preferences:".cyan().bold());
    println!("  Theme:   {}", prefs.theme);
    println!(
        "  Sidebar: {}",
        if prefs.sidebar_open { "open" } else { "closed" }
    );
    println!("  Filter:  {}", prefs.filter);
    if prefs.search_query.is_empty() {
        println!("  Search:  {}", "none".dimmed());
    } else {
        println!("  Search:  {}", prefs.search_query);
    }
    println!("  Recent:  keeps {} websites", settings.recent_capacity);
    println!();

    println!(
        "  {}",
        SettingsManager::settings_path()?.display().to_string().dimmed()
    );
    Ok(())
}

/// Set the generation service URL
pub async fn set_server(url: &str) -> Result<()> {
    let server_url = normalize_server_url(url)?;
    update(|settings| settings.server_url = server_url.clone())?;

    println!("{} Server URL set to: {}", "✓".green(), url.trim().cyan());
    println!("  API endpoint: {}", server_url.dimmed());
    Ok(())
}

pub async fn set_timeout(secs: u64) -> Result<()> {
    if secs == 0 {
        bail!("Timeout must be at least one second");
    }
    update(|settings| settings.request_timeout_secs = secs)?;

    println!("{} Request timeout set to {}s", "✓".green(), secs);
    Ok(())
}

/// Set or toggle the theme; `None` toggles
pub async fn theme(theme: Option<Theme>) -> Result<()> {
    let mut chosen = Theme::default();
    update(|settings| {
        let current = settings.preferences.theme;
        settings.preferences.theme = theme.unwrap_or(current.toggled());
        chosen = settings.preferences.theme;
    })?;

    println!("{} Theme set to {}", "✓".green(), chosen.to_string().cyan());
    Ok(())
}

pub async fn filter(filter: VisibilityFilter) -> Result<()> {
    update(|settings| settings.preferences.filter = filter)?;

    println!("{} Listing filter set to {}", "✓".green(), filter.to_string().cyan());
    Ok(())
}

/// Save the search used by listings; `None` clears it
pub async fn search(text: Option<String>) -> Result<()> {
    let text = text.map(|t| t.trim().to_string()).unwrap_or_default();
    update(|settings| settings.preferences.search_query = text.clone())?;

    if text.is_empty() {
        println!("{} Search cleared", "✓".green());
    } else {
        println!("{} Search set to \"{}\"", "✓".green(), text.cyan());
    }
    Ok(())
}

pub async fn sidebar(open: bool) -> Result<()> {
    update(|settings| settings.preferences.sidebar_open = open)?;

    println!(
        "{} Sidebar {}",
        "✓".green(),
        if open { "open" } else { "closed" }
    );
    Ok(())
}

/// Reset configuration to defaults
pub async fn reset() -> Result<()> {
    use dialoguer::Confirm;

    let confirm = Confirm::new()
        .with_prompt("Are you sure you want to reset all configuration?")
        .default(false)
        .interact()?;

    if !confirm {
        println!("{}", "Reset cancelled.".yellow());
        return Ok(());
    }

    SettingsManager::save(&Settings::default()).context("Failed to save default settings")?;

    println!("{} Configuration reset to defaults.", "✓".green());
    Ok(())
}

/// Load the on-disk settings, change them and save them back. Environment
/// overrides are never persisted.
fn update(change: impl FnOnce(&mut Settings)) -> Result<()> {
    let path = SettingsManager::settings_path()?;
    let mut settings = SettingsManager::load_from(&path).context("Failed to load settings")?;
    change(&mut settings);
    SettingsManager::save_to(&path, &settings).context("Failed to save settings")
}
