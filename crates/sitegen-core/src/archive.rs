//! Archive export
//!
//! Packages an artifact into a downloadable zip. Legacy artifacts become a
//! static site with a README. Structured artifacts become a runnable project:
//! every decoded file plus the companion files a fresh checkout needs
//! (`package.json`, `tailwind.config.js`, `next.config.js`, `tsconfig.json`,
//! `README.md`) when the project does not already carry them.

use crate::error::{Result, SiteError};
use crate::project::{SiteContent, StructuredProject};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde_json::{json, Value};
use sitegen_types::Artifact;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// File name stem used when a title sanitizes to nothing
pub const DEFAULT_STEM: &str = "website";

const NEXT_CONFIG: &str = r##"/** @type {import('next').NextConfig} */
const nextConfig = {
  experimental: {
    appDir: true,
  },
}

module.exports = nextConfig
"##;

const TSCONFIG: &str = r##"{
  "compilerOptions": {
    "target": "es5",
    "lib": [
      "dom",
      "dom.iterable",
      "es6"
    ],
    "allowJs": true,
    "skipLibCheck": true,
    "strict": true,
    "noEmit": true,
    "esModuleInterop": true,
    "module": "esnext",
    "moduleResolution": "bundler",
    "resolveJsonModule": true,
    "isolatedModules": true,
    "jsx": "preserve",
    "incremental": true,
    "plugins": [
      {
        "name": "next"
      }
    ],
    "paths": {
      "@/*": [
        "./src/*"
      ]
    }
  },
  "include": [
    "next-env.d.ts",
    "**/*.ts",
    "**/*.tsx",
    ".next/types/**/*.ts"
  ],
  "exclude": [
    "node_modules"
  ]
}
"##;

/// Why an entry is in the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrigin {
    /// Taken from the artifact's own content
    Content,
    /// Generated because the content did not provide it
    Synthesized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveEntry {
    pub path: String,
    pub contents: String,
    pub origin: EntryOrigin,
}

/// Entries of an archive before compression
#[derive(Debug, Clone, PartialEq)]
pub struct ArchivePlan {
    pub file_name: String,
    pub entries: Vec<ArchiveEntry>,
}

impl ArchivePlan {
    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.path.as_str()).collect()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.contents.as_str())
    }

    fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }

    fn push(&mut self, path: &str, contents: String, origin: EntryOrigin) {
        self.entries.push(ArchiveEntry {
            path: path.to_string(),
            contents,
            origin,
        });
    }

    fn push_if_absent(&mut self, path: &str, contents: impl FnOnce() -> String) {
        if !self.contains(path) {
            self.push(path, contents(), EntryOrigin::Synthesized);
        }
    }
}

/// A compressed archive ready to be saved
#[derive(Debug, Clone)]
pub struct BuiltArchive {
    pub file_name: String,
    pub entries: Vec<String>,
    pub bytes: Vec<u8>,
}

impl BuiltArchive {
    /// Save into `dir` under the archive's file name
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        info!("Wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// Builds archives with a fixed build timestamp
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    timestamp: DateTime<Utc>,
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder {
    /// Builder stamped with the current time
    pub fn new() -> Self {
        Self {
            timestamp: Utc::now(),
        }
    }

    /// Use a specific build timestamp. Two builds of the same artifact with
    /// the same timestamp are byte-identical.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Decide the archive's entries without compressing anything
    pub fn plan(&self, artifact: &Artifact) -> Result<ArchivePlan> {
        let content = SiteContent::ingest(artifact)?;
        Ok(self.plan_content(artifact, &content))
    }

    /// Plan from already-ingested content
    pub fn plan_content(&self, artifact: &Artifact, content: &SiteContent) -> ArchivePlan {
        let mut plan = ArchivePlan {
            file_name: archive_file_name(&artifact.title),
            entries: Vec::new(),
        };

        match content {
            SiteContent::Legacy { html, css } => {
                plan.push("index.html", html.clone(), EntryOrigin::Content);
                plan.push("styles.css", css.clone(), EntryOrigin::Content);
                plan.push(
                    "README.md",
                    self.legacy_readme(&artifact.title),
                    EntryOrigin::Synthesized,
                );
            }
            SiteContent::Structured {
                project,
                style_config,
            } => {
                for (path, source) in project.files() {
                    plan.push(&path, source.to_string(), EntryOrigin::Content);
                }
                self.add_companions(&mut plan, artifact, project, style_config);
            }
        }

        debug!(
            "Planned {} with {} entries",
            plan.file_name,
            plan.entries.len()
        );
        plan
    }

    /// Plan and compress
    pub fn build(&self, artifact: &Artifact) -> Result<BuiltArchive> {
        let plan = self.plan(artifact)?;
        self.pack(&plan)
    }

    /// Compress a plan into zip bytes
    pub fn pack(&self, plan: &ArchivePlan) -> Result<BuiltArchive> {
        let modified = zip::DateTime::from_date_and_time(
            u16::try_from(self.timestamp.year()).unwrap_or(1980),
            self.timestamp.month() as u8,
            self.timestamp.day() as u8,
            self.timestamp.hour() as u8,
            self.timestamp.minute() as u8,
            self.timestamp.second() as u8,
        )
        .unwrap_or_default();

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(modified)
            .unix_permissions(0o644);

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for entry in &plan.entries {
            writer.start_file(entry.path.as_str(), options)?;
            writer
                .write_all(entry.contents.as_bytes())
                .map_err(|e| SiteError::Archive(format!("{}: {}", entry.path, e)))?;
        }
        let bytes = writer.finish()?.into_inner();

        info!(
            "Built {} ({} entries, {} bytes)",
            plan.file_name,
            plan.entries.len(),
            bytes.len()
        );

        Ok(BuiltArchive {
            file_name: plan.file_name.clone(),
            entries: plan.entries.iter().map(|e| e.path.clone()).collect(),
            bytes,
        })
    }

    fn add_companions(
        &self,
        plan: &mut ArchivePlan,
        artifact: &Artifact,
        project: &StructuredProject,
        style_config: &str,
    ) {
        // Declared metadata always wins over a decoded package.json.
        if let Some(package) = artifact.package_json() {
            let body = serde_json::to_string_pretty(&Value::Object(package.clone()))
                .unwrap_or_else(|_| "{}".to_string());
            plan.entries.retain(|e| e.path != "package.json");
            plan.push("package.json", body, EntryOrigin::Synthesized);
        } else if !project.contains("package.json") {
            plan.push(
                "package.json",
                default_package_json(&artifact.title),
                EntryOrigin::Synthesized,
            );
        }

        plan.push_if_absent("tailwind.config.js", || style_config.to_string());
        plan.push_if_absent("next.config.js", || NEXT_CONFIG.to_string());
        plan.push_if_absent("tsconfig.json", || TSCONFIG.to_string());
        plan.push_if_absent("README.md", || self.project_readme(&artifact.title));
    }

    fn generated_on(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }

    fn legacy_readme(&self, title: &str) -> String {
        format!(
            "# {}\n\n\
             This website was generated using AI Website Builder.\n\n\
             ## Files\n\
             - index.html - Main HTML file\n\
             - styles.css - CSS styles\n\n\
             ## Usage\n\
             1. Open index.html in your web browser\n\
             2. The CSS file is already linked in the HTML\n\n\
             Generated on: {}\n",
            title,
            self.generated_on()
        )
    }

    fn project_readme(&self, title: &str) -> String {
        format!(
            "# {}\n\n\
             This Next.js project was generated using AI Website Builder.\n\n\
             ## Getting Started\n\n\
             1. Install dependencies:\n   ```bash\n   npm install\n   ```\n\n\
             2. Run the development server:\n   ```bash\n   npm run dev\n   ```\n\n\
             3. Open [http://localhost:3000](http://localhost:3000) in your browser.\n\n\
             ## Project Structure\n\n\
             - `src/app/` - Next.js App Router pages\n\
             - `src/components/` - React components\n\
             - `tailwind.config.js` - Tailwind CSS configuration\n\
             - `package.json` - Project dependencies\n\n\
             Generated on: {}\n",
            title,
            self.generated_on()
        )
    }
}

/// Build an archive stamped with the current time
pub fn build_archive(artifact: &Artifact) -> Result<BuiltArchive> {
    ArchiveBuilder::new().build(artifact)
}

fn default_package_json(title: &str) -> String {
    let name = title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    let package = json!({
        "name": name,
        "version": "0.1.0",
        "private": true,
        "scripts": {
            "dev": "next dev",
            "build": "next build",
            "start": "next start",
            "lint": "next lint"
        },
        "dependencies": {
            "next": "^14.0.0",
            "react": "^18.0.0",
            "react-dom": "^18.0.0"
        },
        "devDependencies": {
            "@types/node": "^20.0.0",
            "@types/react": "^18.0.0",
            "@types/react-dom": "^18.0.0",
            "eslint": "^8.0.0",
            "eslint-config-next": "^14.0.0",
            "typescript": "^5.0.0"
        }
    });

    serde_json::to_string_pretty(&package).unwrap_or_else(|_| "{}".to_string())
}

/// Reduce a title to a portable file name stem: lower-cased, runs of
/// anything outside ASCII letters and digits collapsed to `_`, no leading
/// or trailing `_`.
pub fn sanitize_filename(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !stem.is_empty() {
                stem.push('_');
            }
            pending_separator = false;
            stem.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    stem
}

/// `<stem>.zip`, falling back to `website.zip`
pub fn archive_file_name(title: &str) -> String {
    format!("{}.zip", file_stem(title))
}

fn file_stem(title: &str) -> String {
    let stem = sanitize_filename(title);
    if stem.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        stem
    }
}

/// Which raw content field to download on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleFile {
    Html,
    Css,
}

impl SingleFile {
    pub fn extension(&self) -> &'static str {
        match self {
            SingleFile::Html => "html",
            SingleFile::Css => "css",
        }
    }
}

/// `(file name, contents)` for a single raw content field
pub fn single_file_download(artifact: &Artifact, file: SingleFile) -> (String, String) {
    let contents = match file {
        SingleFile::Html => artifact.html_content.clone(),
        SingleFile::Css => artifact.css_content.clone(),
    };
    (
        format!("{}.{}", file_stem(&artifact.title), file.extension()),
        contents,
    )
}
