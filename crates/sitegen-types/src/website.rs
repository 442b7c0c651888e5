//! Website (artifact) types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated website record as returned by the generation service.
///
/// `html_content` and `css_content` keep their wire names even though a
/// structured project stores a JSON file map in the former and a style
/// framework config in the latter. Interpretation happens once, at
/// ingestion, in `sitegen_core::SiteContent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub html_content: String,
    #[serde(default)]
    pub css_content: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ArtifactMetadata>,
}

impl Artifact {
    /// Copy of this artifact with the secondary preview payload applied.
    ///
    /// Empty payload fields leave the original content in place.
    pub fn with_preview(&self, preview: &PreviewPayload) -> Artifact {
        let mut display = self.clone();
        if !preview.html.is_empty() {
            display.html_content = preview.html.clone();
        }
        if !preview.css.is_empty() {
            display.css_content = preview.css.clone();
        }
        display
    }

    /// Apply a partial update in place
    pub fn apply_update(&mut self, update: &WebsiteUpdate) {
        if let Some(ref title) = update.title {
            self.title = title.clone();
        }
        if let Some(ref description) = update.description {
            self.description = description.clone();
        }
        if let Some(is_public) = update.is_public {
            self.is_public = is_public;
        }
        if let Some(ref html) = update.html_content {
            self.html_content = html.clone();
        }
        if let Some(ref css) = update.css_content {
            self.css_content = css.clone();
        }
    }

    pub fn framework(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.framework.as_deref())
    }

    pub fn styling(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.styling.as_deref())
    }

    pub fn package_json(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.metadata.as_ref().and_then(|m| m.package_json.as_ref())
    }
}

/// Declared generation metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styling: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_json: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Server-trimmed preview content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewPayload {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub css: String,
}

/// Website generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            title: None,
            description: None,
            is_public: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }
}

/// Partial website update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_content: Option<String>,
}

impl WebsiteUpdate {
    pub fn is_empty(&self) -> bool {
        self == &WebsiteUpdate::default()
    }
}

/// One page of a website listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsitePage {
    #[serde(default)]
    pub websites: Vec<Artifact>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

/// Listing parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 12,
            search: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Artifact {
        serde_json::from_value(serde_json::json!({
            "id": "abc123",
            "title": "Bakery",
            "description": "A small bakery",
            "prompt": "Build a bakery website with a menu",
            "htmlContent": "<h1>Bakery</h1>",
            "cssContent": "h1 { color: brown; }",
            "isPublic": true,
            "createdAt": "2024-05-01T12:00:00Z",
            "metadata": { "framework": "html", "styling": "tailwind-css" }
        }))
        .unwrap()
    }

    #[test]
    fn test_artifact_camel_case_fields() {
        let artifact = sample();
        assert_eq!(artifact.html_content, "<h1>Bakery</h1>");
        assert!(artifact.is_public);
        assert_eq!(artifact.framework(), Some("html"));

        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["cssContent"], "h1 { color: brown; }");
        assert!(json.get("css_content").is_none());
    }

    #[test]
    fn test_preview_override_leaves_original_untouched() {
        let artifact = sample();
        let display = artifact.with_preview(&PreviewPayload {
            html: "<p>trimmed</p>".to_string(),
            css: String::new(),
        });

        assert_eq!(display.html_content, "<p>trimmed</p>");
        assert_eq!(display.css_content, artifact.css_content);
        assert_eq!(artifact.html_content, "<h1>Bakery</h1>");
    }

    #[test]
    fn test_apply_update() {
        let mut artifact = sample();
        artifact.apply_update(&WebsiteUpdate {
            title: Some("Corner Bakery".to_string()),
            is_public: Some(false),
            ..Default::default()
        });

        assert_eq!(artifact.title, "Corner Bakery");
        assert!(!artifact.is_public);
        assert_eq!(artifact.description, "A small bakery");
    }

    #[test]
    fn test_generate_request_omits_unset_fields() {
        let request = GenerateRequest::new("Build a landing page").public(false);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["isPublic"], false);
        assert!(json.get("title").is_none());
    }
}
