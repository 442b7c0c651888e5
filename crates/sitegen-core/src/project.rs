//! Structured project decoding and the ingested content union

use crate::classify::{classify, Classification};
use crate::error::{Result, SiteError};
use serde_json::Value;
use sitegen_types::Artifact;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Primary page of a structured project
pub const PRIMARY_PAGE: &str = "page.tsx";

/// Global stylesheet of a structured project
pub const GLOBAL_STYLESHEET: &str = "globals.css";

/// Key of the nested component sub-mapping, also its archive directory
pub const COMPONENTS_DIR: &str = "components";

/// A decoded multi-file project.
///
/// Root entries map a path to its source. The `components` key may hold a
/// nested mapping of component file names, which lives under
/// `components/` once flattened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredProject {
    root: BTreeMap<String, String>,
    components: BTreeMap<String, String>,
    skipped: Vec<String>,
}

impl StructuredProject {
    /// Decode a JSON file map. Never panics on malformed input.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| SiteError::Decode(e.to_string()))?;

        let entries = match value {
            Value::Object(map) => map,
            other => {
                return Err(SiteError::Decode(format!(
                    "expected an object of files, found {}",
                    json_kind(&other)
                )))
            }
        };

        let mut project = StructuredProject::default();
        for (key, value) in entries {
            match value {
                Value::String(source) => {
                    project.root.insert(key, source);
                }
                Value::Object(nested) if key == COMPONENTS_DIR => {
                    for (name, source) in nested {
                        match source {
                            Value::String(source) => {
                                project.components.insert(name, source);
                            }
                            other => {
                                debug!("Skipping component {} ({})", name, json_kind(&other));
                                project.skipped.push(format!("{}/{}", COMPONENTS_DIR, name));
                            }
                        }
                    }
                }
                other => {
                    debug!("Skipping project entry {} ({})", key, json_kind(&other));
                    project.skipped.push(key);
                }
            }
        }

        Ok(project)
    }

    /// Add or replace a root-level file
    pub fn insert_file(&mut self, path: impl Into<String>, source: impl Into<String>) {
        self.root.insert(path.into(), source.into());
    }

    /// Add or replace a component in the nested sub-mapping
    pub fn insert_component(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.components.insert(name.into(), source.into());
    }

    /// Every file as `(archive path, source)`, sorted by path.
    ///
    /// Explorer and archive builder both enumerate through here. A nested
    /// component shadows a root key with the same flattened path.
    pub fn files(&self) -> Vec<(String, &str)> {
        let mut files: BTreeMap<String, &str> = self
            .root
            .iter()
            .map(|(path, source)| (path.clone(), source.as_str()))
            .collect();

        for (name, source) in &self.components {
            files.insert(component_path(name), source.as_str());
        }

        files.into_iter().collect()
    }

    /// Every archive path, sorted
    pub fn paths(&self) -> Vec<String> {
        self.files().into_iter().map(|(path, _)| path).collect()
    }

    /// Look up a file by archive path
    pub fn get(&self, path: &str) -> Option<&str> {
        if let Some(name) = path.strip_prefix("components/") {
            if let Some(source) = self.components.get(name) {
                return Some(source.as_str());
            }
        }
        self.root.get(path).map(|s| s.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn primary_page(&self) -> Option<&str> {
        self.root.get(PRIMARY_PAGE).map(|s| s.as_str())
    }

    pub fn global_stylesheet(&self) -> Option<&str> {
        self.root.get(GLOBAL_STYLESHEET).map(|s| s.as_str())
    }

    /// Root-level entries as decoded
    pub fn root_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.root.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Nested component names as decoded, without the directory prefix
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(|k| k.as_str())
    }

    /// Entries dropped during decoding because of an unknown shape
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.components.is_empty()
    }
}

/// Archive path of a nested component
pub fn component_path(name: &str) -> String {
    format!("{}/{}", COMPONENTS_DIR, name)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// An artifact's payload, interpreted once at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteContent {
    Legacy {
        html: String,
        css: String,
    },
    Structured {
        project: StructuredProject,
        /// Style framework configuration body (the wire `cssContent`)
        style_config: String,
    },
}

impl SiteContent {
    /// Classify and decode an artifact.
    ///
    /// A structured artifact whose payload does not decode yields
    /// `SiteError::Decode`; the error is also logged.
    pub fn ingest(artifact: &Artifact) -> Result<SiteContent> {
        let classification = classify(artifact);
        debug!("Artifact {} classified as {}", artifact.id, classification);

        match classification {
            Classification::Legacy => Ok(SiteContent::Legacy {
                html: artifact.html_content.clone(),
                css: artifact.css_content.clone(),
            }),
            Classification::Structured => {
                let project = StructuredProject::parse(&artifact.html_content).map_err(|e| {
                    warn!("Artifact {} has an undecodable project: {}", artifact.id, e);
                    e
                })?;
                if !project.skipped().is_empty() {
                    warn!(
                        "Artifact {}: skipped entries with unknown shape: {}",
                        artifact.id,
                        project.skipped().join(", ")
                    );
                }
                Ok(SiteContent::Structured {
                    project,
                    style_config: artifact.css_content.clone(),
                })
            }
        }
    }

    pub fn classification(&self) -> Classification {
        match self {
            SiteContent::Legacy { .. } => Classification::Legacy,
            SiteContent::Structured { .. } => Classification::Structured,
        }
    }
}
