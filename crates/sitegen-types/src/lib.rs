//! Sitegen Types - Pure type definitions shared by the library and the CLI
//!
//! This crate contains only serde data types with no async runtime
//! dependencies: the website records exchanged with the generation service,
//! their request/response envelopes, and the settings persisted on disk.

pub mod api;
pub mod health;
pub mod website;

pub use api::*;
pub use health::*;
pub use website::*;

use serde::{Deserialize, Serialize};

/// Default generation service endpoint
pub const DEFAULT_SERVER_URL: &str =
    "https://mini-website-ai-builder-production.up.railway.app/api/v1";

/// Default client timeout for requests, in seconds. Generation is slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default capacity of the recent-results list
pub const DEFAULT_RECENT_CAPACITY: usize = 50;

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Which websites a listing shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityFilter {
    #[default]
    All,
    PublicOnly,
    PrivateOnly,
}

impl VisibilityFilter {
    /// Whether a website passes this filter
    pub fn admits(&self, website: &Artifact) -> bool {
        match self {
            VisibilityFilter::All => true,
            VisibilityFilter::PublicOnly => website.is_public,
            VisibilityFilter::PrivateOnly => !website.is_public,
        }
    }
}

impl std::fmt::Display for VisibilityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisibilityFilter::All => write!(f, "all"),
            VisibilityFilter::PublicOnly => write!(f, "public"),
            VisibilityFilter::PrivateOnly => write!(f, "private"),
        }
    }
}

/// The persisted subset of UI state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub sidebar_open: bool,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub filter: VisibilityFilter,
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            sidebar_open: true,
            search_query: String::new(),
            filter: VisibilityFilter::All,
        }
    }
}

/// Settings persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub version: String,
    pub server_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_recent_capacity")]
    pub recent_capacity: usize,
    #[serde(default)]
    pub preferences: Preferences,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_recent_capacity() -> usize {
    DEFAULT_RECENT_CAPACITY
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            recent_capacity: DEFAULT_RECENT_CAPACITY,
            preferences: Preferences::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_fill_missing_fields() {
        let settings: Settings = serde_json::from_str(
            r#"{"version":"1.0.0","server_url":"http://localhost:3001/api/v1"}"#,
        )
        .unwrap();

        assert_eq!(settings.request_timeout_secs, 60);
        assert_eq!(settings.recent_capacity, 50);
        assert_eq!(settings.preferences.theme, Theme::Dark);
        assert!(settings.preferences.sidebar_open);
        assert_eq!(settings.preferences.filter, VisibilityFilter::All);
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }
}
