//! Artifact classification
//!
//! Decides which of the two payload representations an artifact uses. The
//! decision only looks at declared metadata and the first non-whitespace
//! character of `htmlContent`, so it is stable for a given record.

use serde::{Deserialize, Serialize};
use sitegen_types::Artifact;

/// Framework name that marks a structured multi-file project
pub const STRUCTURED_MARKER: &str = "Next.js";

/// How an artifact's content payload is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// A single HTML document plus a stylesheet
    Legacy,
    /// A JSON-encoded file map resembling a framework scaffold
    Structured,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Legacy => "legacy",
            Classification::Structured => "structured",
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Classification::Structured)
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify an artifact. First match wins.
pub fn classify(artifact: &Artifact) -> Classification {
    if artifact.framework() == Some(STRUCTURED_MARKER) {
        return Classification::Structured;
    }

    if artifact
        .styling()
        .map(|s| s.contains(STRUCTURED_MARKER))
        .unwrap_or(false)
    {
        return Classification::Structured;
    }

    if artifact.html_content.trim_start().starts_with('{') {
        return Classification::Structured;
    }

    Classification::Legacy
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegen_types::ArtifactMetadata;

    fn artifact(html: &str, metadata: Option<ArtifactMetadata>) -> Artifact {
        Artifact {
            id: "a1".to_string(),
            title: "Test".to_string(),
            description: String::new(),
            prompt: String::new(),
            html_content: html.to_string(),
            css_content: String::new(),
            is_public: false,
            created_at: chrono::Utc::now(),
            metadata,
        }
    }

    fn framework(name: &str) -> Option<ArtifactMetadata> {
        Some(ArtifactMetadata {
            framework: Some(name.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_framework_marker_wins_regardless_of_content() {
        for html in ["<html></html>", "", "not json {", "{\"page.tsx\":\"x\"}"] {
            assert_eq!(
                classify(&artifact(html, framework("Next.js"))),
                Classification::Structured,
                "content {:?}",
                html
            );
        }
    }

    #[test]
    fn test_framework_marker_is_case_sensitive() {
        assert_eq!(
            classify(&artifact("<div></div>", framework("next.js"))),
            Classification::Legacy
        );
    }

    #[test]
    fn test_styling_substring() {
        let metadata = Some(ArtifactMetadata {
            styling: Some("Next.js + Tailwind CSS + shadcn/ui".to_string()),
            ..Default::default()
        });
        assert_eq!(
            classify(&artifact("<div></div>", metadata)),
            Classification::Structured
        );
    }

    #[test]
    fn test_content_sniffing() {
        assert_eq!(
            classify(&artifact("  \n {\"page.tsx\": \"\"}", None)),
            Classification::Structured
        );
        assert_eq!(classify(&artifact("<!DOCTYPE html>", None)), Classification::Legacy);
        assert_eq!(classify(&artifact("", None)), Classification::Legacy);
        assert_eq!(
            classify(&artifact("[1, 2]", framework("html"))),
            Classification::Legacy
        );
    }
}
