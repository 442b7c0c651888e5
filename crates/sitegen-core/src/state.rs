//! Client state container
//!
//! Holds everything a session knows beyond the server: the persisted
//! preferences, the recently seen websites, the generation indicator, the
//! last health report and listing pagination. It is an ordinary value owned
//! by the `Dashboard`; nothing here is global.

use serde::{Deserialize, Serialize};
use sitegen_types::{
    Artifact, Preferences, SystemHealth, Theme, VisibilityFilter, WebsiteUpdate,
    DEFAULT_RECENT_CAPACITY,
};
use std::collections::VecDeque;

/// Most-recent-first list of websites, bounded to a fixed capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentResults {
    capacity: usize,
    items: VecDeque<Artifact>,
}

impl Default for RecentResults {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RECENT_CAPACITY)
    }
}

impl RecentResults {
    /// A capacity of zero is treated as one
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Insert at the head. An entry with the same id moves to the head and
    /// the oldest entry is dropped once the list is full.
    pub fn add(&mut self, website: Artifact) {
        self.items.retain(|w| w.id != website.id);
        self.items.push_front(website);
        self.items.truncate(self.capacity);
    }

    /// Replace the whole list, keeping the first `capacity` entries
    pub fn replace(&mut self, websites: Vec<Artifact>) {
        self.items = websites.into_iter().take(self.capacity).collect();
    }

    /// Apply a partial update to a listed website
    pub fn update(&mut self, id: &str, update: &WebsiteUpdate) -> bool {
        match self.items.iter_mut().find(|w| w.id == id) {
            Some(website) => {
                website.apply_update(update);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Artifact> {
        let index = self.items.iter().position(|w| w.id == id)?;
        self.items.remove(index)
    }

    pub fn get(&self, id: &str) -> Option<&Artifact> {
        self.items.iter().find(|w| w.id == id)
    }

    pub fn head(&self) -> Option<&Artifact> {
        self.items.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Generation indicator. Progress is a percentage in `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerationProgress {
    pub is_generating: bool,
    pub progress: f64,
}

impl GenerationProgress {
    pub fn started() -> Self {
        Self {
            is_generating: true,
            progress: 0.0,
        }
    }

    pub fn idle() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub preferences: Preferences,
    pub recent: RecentResults,
    pub generation: GenerationProgress,
    pub system_health: Option<SystemHealth>,
    pub current_page: u32,
    pub total_pages: u32,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Preferences::default(), DEFAULT_RECENT_CAPACITY)
    }
}

impl AppState {
    pub fn new(preferences: Preferences, recent_capacity: usize) -> Self {
        Self {
            preferences,
            recent: RecentResults::with_capacity(recent_capacity),
            generation: GenerationProgress::idle(),
            system_health: None,
            current_page: 1,
            total_pages: 1,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.preferences.theme = theme;
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.preferences.theme = self.preferences.theme.toggled();
        self.preferences.theme
    }

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.preferences.sidebar_open = open;
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.preferences.sidebar_open = !self.preferences.sidebar_open;
        self.preferences.sidebar_open
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.preferences.search_query = query.into();
    }

    pub fn set_filter(&mut self, filter: VisibilityFilter) {
        self.preferences.filter = filter;
    }

    /// Saved search, if any
    pub fn search(&self) -> Option<&str> {
        let query = self.preferences.search_query.trim();
        if query.is_empty() {
            None
        } else {
            Some(query)
        }
    }

    pub fn set_pagination(&mut self, current_page: u32, total_pages: u32) {
        self.current_page = current_page.max(1);
        self.total_pages = total_pages.max(1);
    }
}
