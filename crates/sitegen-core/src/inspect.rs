//! Content inspection and display formatting helpers

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static TITLE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").expect("title pattern"));
static H1_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<h1[^>]*>([^<]+)</h1>").expect("h1 pattern"));
static OPEN_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^/][^>]*>").expect("open tag pattern"));
static CLOSE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</[^>]*>").expect("close tag pattern"));

/// Title of an HTML document: `<title>`, else the first `<h1>`, else a
/// placeholder
pub fn extract_title_from_html(html: &str) -> String {
    TITLE_TAG
        .captures(html)
        .or_else(|| H1_TAG.captures(html))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled Website".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlReport {
    pub errors: Vec<String>,
}

impl HtmlReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Shallow structural checks on an HTML document.
///
/// Looks for the document skeleton and compares opening and closing tag
/// counts. Void elements count as opening tags, so fragments using them
/// report a mismatch.
pub fn validate_html(html: &str) -> HtmlReport {
    let mut errors = Vec::new();

    for tag in ["html", "body", "head"] {
        if !html.contains(&format!("<{}", tag)) {
            errors.push(format!("Missing <{}> tag", tag));
        }
    }

    let opening = OPEN_TAG.find_iter(html).count();
    let closing = CLOSE_TAG.find_iter(html).count();
    if opening != closing {
        errors.push("Mismatched HTML tags".to_string());
    }

    HtmlReport { errors }
}

/// Human readable byte count, e.g. `1.5 KB`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// `Just now`, `N minutes ago`, `N hours ago`, `N days ago`, else a date
pub fn format_relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - at).num_seconds();
    match seconds {
        s if s < 60 => "Just now".to_string(),
        s if s < 3_600 => format!("{} minutes ago", s / 60),
        s if s < 86_400 => format!("{} hours ago", s / 3_600),
        s if s < 2_592_000 => format!("{} days ago", s / 86_400),
        _ => format_date(at),
    }
}

/// `May 1, 2024, 12:30 PM`
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %I:%M %p").to_string()
}
