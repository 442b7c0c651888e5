//! Command implementations and the shared session they run in

pub mod config;
pub mod export;
pub mod files;
pub mod generate;
pub mod health;
pub mod list;
pub mod manage;
pub mod preview;
pub mod show;

use crate::api::Client;
use crate::config::SettingsManager;
use crate::store::{self, ArtifactStore};
use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use sitegen_core::inspect::{extract_title_from_html, format_relative_time, validate_html};
use sitegen_core::{
    classify, framework_badges, AppState, BadgeVariant, Dashboard, RequestError, SiteError,
};
use sitegen_types::{Artifact, Settings};
use std::path::PathBuf;
use tracing::debug;

/// Which website a command works on
#[derive(Args, Debug, Clone, Default)]
pub struct Target {
    /// Website id (defaults to the most recent website)
    pub id: Option<String>,

    /// Read the website from a JSON file instead
    #[arg(long, conflicts_with = "id")]
    pub file: Option<PathBuf>,
}

/// Settings, service client, state and local store for one invocation
pub struct Session {
    pub settings: Settings,
    pub dashboard: Dashboard<Client>,
    pub store: ArtifactStore,
    pub offline: bool,
}

impl Session {
    pub fn open(offline: bool) -> Result<Self> {
        let settings = SettingsManager::load().context("Failed to load settings")?;
        let store = ArtifactStore::new(SettingsManager::artifacts_dir()?);
        Self::with_store(settings, store, offline)
    }

    /// Session over explicit settings and store, restoring the recent list
    /// from the store
    pub fn with_store(settings: Settings, store: ArtifactStore, offline: bool) -> Result<Self> {
        let client = Client::from_settings(&settings)?;

        let mut state = AppState::new(settings.preferences.clone(), settings.recent_capacity);
        state.recent = store
            .load_recent(settings.recent_capacity)
            .context("Failed to load recent websites")?;

        debug!(
            "Session against {} ({} recent)",
            client.base_url(),
            state.recent.len()
        );

        Ok(Self {
            settings,
            dashboard: Dashboard::new(client, state),
            store,
            offline,
        })
    }

    /// Persist preferences and the recent list
    pub fn close(self) -> Result<()> {
        let state = self.dashboard.into_state();
        self.store
            .save_recent(&state.recent)
            .context("Failed to save recent websites")?;

        // Re-read from disk so environment overrides are not written back
        let path = SettingsManager::settings_path()?;
        let mut settings = SettingsManager::load_from(&path)?;
        settings.preferences = state.preferences;
        SettingsManager::save_to(&path, &settings).context("Failed to save settings")?;
        Ok(())
    }

    /// Resolve the website a command targets.
    ///
    /// `--file` wins, then the local store when offline, then the service.
    /// The plain record is stored. With `display` set the returned copy has
    /// the service's preview payload applied, as the preview page shows it.
    pub async fn artifact(&self, target: &Target, display: bool) -> Result<Artifact> {
        if let Some(path) = &target.file {
            return store::load_file(path);
        }

        let id = match &target.id {
            Some(id) => id.clone(),
            None => self
                .dashboard
                .state()
                .recent
                .head()
                .map(|w| w.id.clone())
                .context("No website given and no recent websites. Pass an id or --file.")?,
        };

        if self.offline {
            return self
                .store
                .load(&id)?
                .with_context(|| format!("Website {} is not stored locally", id));
        }

        match self.dashboard.website(&id).await {
            Ok(website) => {
                self.store.save(&website)?;
                if !display {
                    return Ok(website);
                }
                // The record is cached, so this only adds the preview read
                self.dashboard.preview_view(&id).await.map_err(user_error)
            }
            Err(SiteError::Request(RequestError::Network(_))) => {
                // Unreachable service: fall back to the local copy when there is one
                match self.store.load(&id)? {
                    Some(website) => {
                        println!(
                            "{}",
                            "Service unreachable, showing the stored copy.".yellow()
                        );
                        Ok(website)
                    }
                    None => Err(user_error(SiteError::Request(RequestError::Network(
                        String::new(),
                    )))),
                }
            }
            Err(e) => Err(user_error(e)),
        }
    }

    pub fn require_online(&self) -> Result<()> {
        if self.offline {
            bail!("This command needs the generation service; drop --offline");
        }
        Ok(())
    }
}

/// Turn a library error into the message shown to the user
pub fn user_error(e: SiteError) -> anyhow::Error {
    if let SiteError::Request(RequestError::BadRequest { suggestions, .. }) = &e {
        for suggestion in suggestions {
            println!("  {} {}", "→".cyan(), suggestion);
        }
    }
    anyhow!(e.user_message())
}

/// The record's title, else the one its HTML declares
pub fn display_title(website: &Artifact) -> String {
    let title = website.title.trim();
    if !title.is_empty() {
        return title.to_string();
    }
    if classify(website).is_structured() {
        return extract_title_from_html("");
    }
    extract_title_from_html(&website.html_content)
}

/// Structural problems in a single-page website's HTML. Structured
/// projects and empty content report nothing.
pub fn html_warnings(website: &Artifact) -> Vec<String> {
    if website.html_content.trim().is_empty() || classify(website).is_structured() {
        return Vec::new();
    }
    validate_html(&website.html_content).errors
}

/// One line per website in listings
pub fn print_summary(website: &Artifact) {
    let visibility = if website.is_public {
        "public".green()
    } else {
        "private".dimmed()
    };
    println!(
        "  {} {} [{}] {}",
        display_title(website).bold(),
        website.id.dimmed(),
        visibility,
        format_relative_time(website.created_at, Utc::now()).dimmed()
    );
    if !website.description.is_empty() {
        println!("    {}", website.description);
    }
}

pub fn print_badges(website: &Artifact) {
    let badges = framework_badges(website.metadata.as_ref());
    if badges.is_empty() {
        return;
    }
    let rendered: Vec<String> = badges
        .iter()
        .map(|b| {
            let label = format!("{} {}", b.icon, b.name);
            match b.variant {
                BadgeVariant::Default => label.cyan().bold().to_string(),
                BadgeVariant::Secondary => label.magenta().to_string(),
                BadgeVariant::Outline => label.normal().to_string(),
            }
        })
        .collect();
    println!("  {}", rendered.join("  "));
}

/// Detail view of a single website
pub fn print_detail(website: &Artifact) {
    println!("{}", display_title(website).bold().underline());
    println!();
    println!("  ID:          {}", website.id);
    if !website.description.is_empty() {
        println!("  Description: {}", website.description);
    }
    println!(
        "  Visibility:  {}",
        if website.is_public {
            "Public".green()
        } else {
            "Private".yellow()
        }
    );
    println!(
        "  Created:     {} ({})",
        sitegen_core::inspect::format_date(website.created_at),
        format_relative_time(website.created_at, Utc::now()).dimmed()
    );
    println!("  Format:      {}", classify(website));
    if let Some(theme) = website.metadata.as_ref().and_then(|m| m.theme.as_deref()) {
        println!("  Theme:       {}", theme);
    }
    print_badges(website);
    println!();
    println!("{}", "Prompt:".cyan().bold());
    println!("  {}", website.prompt);
}
