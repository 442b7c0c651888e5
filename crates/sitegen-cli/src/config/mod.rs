//! Configuration management

use anyhow::{bail, Context, Result};
use sitegen_types::Settings;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Overrides the configured server URL for a single invocation
pub const API_URL_ENV: &str = "SITEGEN_API_URL";

pub struct SettingsManager;

impl SettingsManager {
    /// Get the sitegen home directory (~/.sitegen)
    pub fn sitegen_home() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("SITEGEN_HOME") {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".sitegen"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Result<PathBuf> {
        Ok(Self::sitegen_home()?.join("settings.json"))
    }

    /// Directory holding locally cached websites
    pub fn artifacts_dir() -> Result<PathBuf> {
        Ok(Self::sitegen_home()?.join("artifacts"))
    }

    /// Load settings from disk, applying the environment override
    pub fn load() -> Result<Settings> {
        let mut settings = Self::load_from(&Self::settings_path()?)?;

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                debug!("Using server URL from {}", API_URL_ENV);
                settings.server_url = url.trim().trim_end_matches('/').to_string();
            }
        }

        Ok(settings)
    }

    /// Load settings from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {:?}", path))
    }

    /// Save settings to disk
    pub fn save(settings: &Settings) -> Result<()> {
        Self::save_to(&Self::settings_path()?, settings)
    }

    pub fn save_to(path: &Path, settings: &Settings) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;

        // Set permissions on Unix (restrict to owner only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }
}

/// Normalize a server address into an API base URL
pub fn normalize_server_url(url: &str) -> Result<String> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        bail!("Invalid URL: must start with http:// or https://");
    }

    let url = url.trim_end_matches('/');
    if url.ends_with("/api/v1") {
        Ok(url.to_string())
    } else {
        Ok(format!("{}/api/v1", url))
    }
}
