//! Live preview rendering
//!
//! Produces a self-contained HTML document for any artifact. Legacy artifacts
//! are wrapped verbatim. Structured artifacts get a best-effort conversion of
//! the primary page's markup, or a keyword-selected placeholder when the page
//! is too short or uses constructs the conversion does not understand.

use crate::project::{SiteContent, StructuredProject};
use crate::templates::{escape_html, template_for};
use once_cell::sync::Lazy;
use regex::Regex;
use sitegen_types::Artifact;
use tracing::{debug, warn};

/// Tailwind CDN runtime injected into structured previews
pub const TAILWIND_CDN: &str = r#"<script src="https://cdn.tailwindcss.com"></script>"#;

/// Pages at or below this many characters are treated as placeholders
pub const TRANSPILE_MIN_CHARS: usize = 50;

const BASE_BODY_STYLE: &str =
    "body { margin: 0; padding: 0; font-family: system-ui, -apple-system, sans-serif; }";

const DEFAULT_TITLE: &str = "Generated Website";

const UNAVAILABLE_DOCUMENT: &str = r##"<!DOCTYPE html>
<html>
<head>
  <title>Preview Error</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="p-8 bg-gray-100">
  <div class="text-center">
    <h1 class="text-2xl font-bold text-gray-800">Preview Error</h1>
    <p class="text-gray-600 mt-2">Unable to generate live preview</p>
  </div>
</body>
</html>
"##;

static IMPORT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*import\b[^\n]*\n?").expect("import pattern"));
static DIRECTIVE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*['"]use (client|server)['"];?[ \t]*\n?"#).expect("directive pattern")
});
static COMPONENT_OPENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"export\s+default\s+(async\s+)?function[^{]*\{").expect("component pattern")
});
static RETURN_OPENING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"return\s*\(").expect("return pattern"));

/// Where the body of a rendered preview came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewSource {
    /// Legacy HTML wrapped as-is
    Verbatim,
    /// Converted from the structured primary page
    Transpiled,
    /// Keyword-selected placeholder
    Template,
    /// The structured payload could not be decoded
    Unavailable,
}

/// A rendered preview document
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub document: String,
    pub source: PreviewSource,
}

/// Render a preview document for an artifact. Never fails.
pub fn render_preview(artifact: &Artifact) -> String {
    render(artifact).document
}

/// Render a preview and report where its body came from
pub fn render(artifact: &Artifact) -> Preview {
    match SiteContent::ingest(artifact) {
        Ok(content) => render_content(artifact, &content),
        Err(e) => {
            warn!("Preview unavailable for {}: {}", artifact.id, e);
            Preview {
                document: UNAVAILABLE_DOCUMENT.to_string(),
                source: PreviewSource::Unavailable,
            }
        }
    }
}

/// Render already-ingested content
pub fn render_content(artifact: &Artifact, content: &SiteContent) -> Preview {
    match content {
        SiteContent::Legacy { html, css } => Preview {
            document: legacy_document(&artifact.title, html, css),
            source: PreviewSource::Verbatim,
        },
        SiteContent::Structured { project, .. } => structured_preview(artifact, project),
    }
}

/// The fixed document shown when a structured payload is undecodable
pub fn unavailable_document() -> &'static str {
    UNAVAILABLE_DOCUMENT
}

fn structured_preview(artifact: &Artifact, project: &StructuredProject) -> Preview {
    let page = project.primary_page().unwrap_or_default();
    let globals = project.global_stylesheet().unwrap_or_default();

    let transpiled = if page.chars().count() > TRANSPILE_MIN_CHARS {
        let markup = transpile_page(page);
        if markup.is_none() {
            debug!(
                "Primary page of {} uses unsupported constructs; using a template",
                artifact.id
            );
        }
        markup
    } else {
        debug!("Primary page of {} is too short to transpile", artifact.id);
        None
    };

    let (body, source) = match transpiled {
        Some(markup) => (markup, PreviewSource::Transpiled),
        None => (template_for(artifact), PreviewSource::Template),
    };

    Preview {
        document: structured_document(&artifact.title, globals, &body),
        source,
    }
}

/// Convert a page component into static markup.
///
/// This is a handful of textual rewrites, not a parser: import lines and
/// client/server directives are dropped, the default-exported function
/// header and its `return (` are removed together with their closing
/// `);` and `}`, `className=` becomes `class=`, and single quotes become
/// double quotes. Expressions in braces and component tags are left alone.
/// Returns `None` when the result is empty or does not start with a tag.
pub fn transpile_page(source: &str) -> Option<String> {
    let without_imports = IMPORT_LINE.replace_all(source, "");
    let without_directives = DIRECTIVE_LINE.replace_all(&without_imports, "");

    let opened = COMPONENT_OPENING.is_match(&without_directives);
    let body = COMPONENT_OPENING.replace(&without_directives, "");

    let returned = RETURN_OPENING.is_match(&body);
    let body = RETURN_OPENING.replace(&body, "");

    let mut body = body.trim();
    if opened {
        if let Some(rest) = body.strip_suffix('}') {
            body = rest.trim_end();
        }
    }
    if returned {
        if let Some(rest) = body.strip_suffix(';') {
            body = rest.trim_end();
        }
        if let Some(rest) = body.strip_suffix(')') {
            body = rest.trim_end();
        }
    }

    let markup = body.replace("className=", "class=").replace('\'', "\"");
    let markup = markup.trim();

    if markup.is_empty() || !markup.starts_with('<') {
        return None;
    }
    Some(markup.to_string())
}

fn display_title(title: &str) -> String {
    if title.trim().is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        escape_html(title)
    }
}

fn legacy_document(title: &str, html: &str, css: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>{css}</style>
</head>
<body>
{html}
</body>
</html>
"#,
        title = display_title(title),
        css = css,
        html = html,
    )
}

fn structured_document(title: &str, globals: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  {tailwind}
  <style>
    {base}
    {globals}
  </style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = display_title(title),
        tailwind = TAILWIND_CDN,
        base = BASE_BODY_STYLE,
        globals = globals,
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegen_types::ArtifactMetadata;

    const PAGE: &str = "import Header from './components/Header';\nimport { Button } from '@/components/ui/button';\n\nexport default function Home() {\n  return (\n    <main className='p-8'>\n      <h1 className=\"text-4xl\">Hello there</h1>\n    </main>\n  );\n}\n";

    fn artifact(html: &str, css: &str, framework: Option<&str>) -> Artifact {
        Artifact {
            id: "p1".to_string(),
            title: "Coffee & Co".to_string(),
            description: String::new(),
            prompt: "A site for my coffee shop".to_string(),
            html_content: html.to_string(),
            css_content: css.to_string(),
            is_public: false,
            created_at: chrono::Utc::now(),
            metadata: framework.map(|f| ArtifactMetadata {
                framework: Some(f.to_string()),
                ..Default::default()
            }),
        }
    }

    fn project(page: &str) -> String {
        serde_json::json!({
            "page.tsx": page,
            "globals.css": ".hero { color: red; }",
        })
        .to_string()
    }

    #[test]
    fn test_transpile_page() {
        let markup = transpile_page(PAGE).unwrap();
        assert_eq!(
            markup,
            "<main class=\"p-8\">\n      <h1 class=\"text-4xl\">Hello there</h1>\n    </main>"
        );
    }

    #[test]
    fn test_transpile_rejects_non_markup() {
        let page = "'use client';\nexport default function Home() {\n  const items = [1, 2, 3];\n  return items.map((i) => i);\n}\n";
        assert_eq!(transpile_page(page), None);
        assert_eq!(transpile_page("import x from 'y';\n"), None);
    }

    #[test]
    fn test_legacy_preview_wraps_verbatim() {
        let preview = render(&artifact("<h1>Menu</h1>", "h1 { color: brown; }", None));
        assert_eq!(preview.source, PreviewSource::Verbatim);
        assert!(preview.document.contains("<style>h1 { color: brown; }</style>"));
        assert!(preview.document.contains("<h1>Menu</h1>"));
        assert!(preview.document.contains("<title>Coffee &amp; Co</title>"));
        assert!(!preview.document.contains("cdn.tailwindcss.com"));
    }

    #[test]
    fn test_legacy_preview_default_title() {
        let mut untitled = artifact("<p>x</p>", "", None);
        untitled.title = String::new();
        assert!(render_preview(&untitled).contains("<title>Generated Website</title>"));
    }

    #[test]
    fn test_structured_preview_transpiles_primary_page() {
        let preview = render(&artifact(&project(PAGE), "module.exports = {}", Some("Next.js")));

        assert_eq!(preview.source, PreviewSource::Transpiled);
        assert!(preview.document.contains(TAILWIND_CDN));
        assert!(preview.document.contains(BASE_BODY_STYLE));
        assert!(preview.document.contains(".hero { color: red; }"));
        assert!(preview.document.contains("<main class=\"p-8\">"));
        assert!(!preview.document.contains("module.exports"));
    }

    #[test]
    fn test_short_page_uses_template() {
        let preview = render(&artifact(&project("<main/>"), "", Some("Next.js")));
        assert_eq!(preview.source, PreviewSource::Template);
        assert!(preview.document.contains("Welcome to Coffee &amp; Co"));
        assert!(preview.document.contains(".hero { color: red; }"));
    }

    #[test]
    fn test_unsupported_page_uses_keyword_template() {
        let page = "export default function Page() {\n  return <Layout><Hero /></Layout>;\n}\n// padding to pass the length threshold\n";
        let mut restaurant = artifact(&project(page), "", Some("Next.js"));
        restaurant.prompt = "Landing page for a FOOD delivery service".to_string();

        let preview = render(&restaurant);
        assert_eq!(preview.source, PreviewSource::Template);
        assert!(preview.document.contains("Delicious Food"));
    }

    #[test]
    fn test_undecodable_structured_payload() {
        let broken = artifact("not json {", "", Some("Next.js"));
        let preview = render(&broken);

        assert_eq!(preview.source, PreviewSource::Unavailable);
        assert_eq!(preview.document, unavailable_document());
        assert!(preview.document.contains("Unable to generate live preview"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let structured = artifact(&project(PAGE), "", Some("Next.js"));
        assert_eq!(render_preview(&structured), render_preview(&structured));
    }
}
