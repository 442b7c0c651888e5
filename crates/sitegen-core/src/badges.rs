//! Technology badges derived from artifact metadata

use serde::Serialize;
use sitegen_types::ArtifactMetadata;

/// Visual weight of a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Default,
    Secondary,
    Outline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub name: String,
    pub icon: &'static str,
    pub variant: BadgeVariant,
}

impl Badge {
    fn new(name: impl Into<String>, icon: &'static str, variant: BadgeVariant) -> Self {
        Self {
            name: name.into(),
            icon,
            variant,
        }
    }
}

/// Badges for the declared framework, the styling stack (split on ` + `)
/// and well-known package dependencies. Names are unique, first wins.
pub fn framework_badges(metadata: Option<&ArtifactMetadata>) -> Vec<Badge> {
    let Some(metadata) = metadata else {
        return Vec::new();
    };

    let mut badges = Vec::new();

    if let Some(framework) = metadata.framework.as_deref().filter(|f| !f.is_empty()) {
        badges.push(Badge::new(framework, "⚛️", BadgeVariant::Default));
    }

    if let Some(styling) = metadata.styling.as_deref() {
        for part in styling.split(" + ") {
            let part = part.trim().to_lowercase();
            if part.contains("tailwind") {
                badges.push(Badge::new("Tailwind CSS", "🎨", BadgeVariant::Secondary));
            }
            if part.contains("shadcn") {
                badges.push(Badge::new("shadcn/ui", "🎭", BadgeVariant::Outline));
            }
        }
    }

    let dependencies = metadata
        .package_json
        .as_ref()
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_object());
    if let Some(deps) = dependencies {
        let declared = |name: &str| deps.get(name).map(|v| !v.is_null()).unwrap_or(false);
        if declared("next") {
            badges.push(Badge::new("Next.js", "⚡", BadgeVariant::Default));
        }
        if declared("react") {
            badges.push(Badge::new("React", "⚛️", BadgeVariant::Secondary));
        }
        if declared("typescript") {
            badges.push(Badge::new("TypeScript", "📘", BadgeVariant::Outline));
        }
    }

    let mut unique: Vec<Badge> = Vec::with_capacity(badges.len());
    for badge in badges {
        if !unique.iter().any(|b| b.name == badge.name) {
            unique.push(badge);
        }
    }
    unique
}
