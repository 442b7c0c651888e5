//! Local copies of websites seen by the CLI
//!
//! Every website fetched or generated is written to `artifacts/<id>.json`
//! so that preview, file and export commands work offline. The recent list
//! is kept as an ordered list of ids in `recent.json`.

use anyhow::{Context, Result};
use sitegen_core::RecentResults;
use sitegen_types::Artifact;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const RECENT_FILE: &str = "recent.json";

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ids are percent-encoded, so every id maps to its own file inside
    /// the store directory
    fn artifact_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(id)))
    }

    pub fn save(&self, artifact: &Artifact) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory {:?}", self.dir))?;

        let path = self.artifact_path(&artifact.id);
        let content =
            serde_json::to_string_pretty(artifact).context("Failed to serialize website")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write website to {:?}", path))?;

        debug!("Stored website {} at {:?}", artifact.id, path);
        Ok(path)
    }

    /// A stored website, `None` when it was never saved
    pub fn load(&self, id: &str) -> Result<Option<Artifact>> {
        let path = self.artifact_path(id);
        if !path.exists() {
            return Ok(None);
        }
        load_file(&path).map(Some)
    }

    pub fn remove(&self, id: &str) -> Result<bool> {
        let path = self.artifact_path(id);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove {:?}", path))?;
        Ok(true)
    }

    /// All stored websites, newest first. Unreadable files are skipped.
    pub fn list(&self) -> Result<Vec<Artifact>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut artifacts = Vec::new();
        for entry in std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read directory {:?}", self.dir))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json")
                || path.file_name().and_then(|n| n.to_str()) == Some(RECENT_FILE)
            {
                continue;
            }
            match load_file(&path) {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => warn!("Skipping {:?}: {:#}", path, e),
            }
        }

        artifacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(artifacts)
    }

    /// Rebuild the recent list from stored ids, dropping ids whose website
    /// is no longer stored
    pub fn load_recent(&self, capacity: usize) -> Result<RecentResults> {
        let mut recent = RecentResults::with_capacity(capacity);
        let path = self.dir.join(RECENT_FILE);
        if !path.exists() {
            return Ok(recent);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        let ids: Vec<String> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;

        let mut websites = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(website) = self.load(&id)? {
                websites.push(website);
            }
        }
        recent.replace(websites);
        Ok(recent)
    }

    /// Persist the recent list, storing every website it holds
    pub fn save_recent(&self, recent: &RecentResults) -> Result<()> {
        let mut ids = Vec::with_capacity(recent.len());
        for website in recent.iter() {
            self.save(website)?;
            ids.push(website.id.clone());
        }

        let path = self.dir.join(RECENT_FILE);
        let content = serde_json::to_string_pretty(&ids)?;
        std::fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }
}

/// Read a website record from a JSON file
pub fn load_file(path: &Path) -> Result<Artifact> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read website from {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse website from {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn website(id: &str, day: u32) -> Artifact {
        Artifact {
            id: id.to_string(),
            title: format!("Site {}", id),
            description: String::new(),
            prompt: "A portfolio for a photographer".to_string(),
            html_content: "<h1>Hello</h1>".to_string(),
            css_content: String::new(),
            is_public: false,
            created_at: Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap(),
            metadata: None,
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("artifacts"));

        store.save(&website("a1", 1)).unwrap();
        let loaded = store.load("a1").unwrap().unwrap();
        assert_eq!(loaded.title, "Site a1");
        assert!(store.load("missing").unwrap().is_none());
    }

    #[test]
    fn test_list_newest_first_and_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        store.save(&website("old", 1)).unwrap();
        store.save(&website("new", 3)).unwrap();
        std::fs::write(dir.path().join("broken.json"), "nope").unwrap();

        let ids: Vec<String> = store.list().unwrap().into_iter().map(|w| w.id).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn test_ids_cannot_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("artifacts"));

        let path = store.save(&website("../../etc/passwd", 1)).unwrap();
        assert!(path.starts_with(store.dir()));
        assert!(store.load("../../etc/passwd").unwrap().is_some());
    }

    #[test]
    fn test_similar_ids_do_not_share_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let slash = store.save(&website("a/b", 1)).unwrap();
        let underscore = store.save(&website("a_b", 2)).unwrap();
        assert_ne!(slash, underscore);

        assert_eq!(store.load("a/b").unwrap().unwrap().id, "a/b");
        assert_eq!(store.load("a_b").unwrap().unwrap().id, "a_b");
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_recent_round_trip_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let mut recent = RecentResults::with_capacity(5);
        recent.add(website("first", 1));
        recent.add(website("second", 2));
        store.save_recent(&recent).unwrap();

        store.remove("first").unwrap();
        store.save(&website("third", 3)).unwrap();

        let loaded = store.load_recent(5).unwrap();
        let ids: Vec<&str> = loaded.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["second"]);
    }
}
