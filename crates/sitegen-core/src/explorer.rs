//! File explorer and code viewer model
//!
//! Both views enumerate files through `StructuredProject::files()`, the same
//! enumeration the archive builder uses, so every path shown here is a path
//! that ends up in the exported archive.

use crate::error::{Result, SiteError};
use crate::project::{SiteContent, StructuredProject, COMPONENTS_DIR, PRIMARY_PAGE};
use std::collections::BTreeSet;

/// A node of the project tree
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    File {
        name: String,
        path: String,
    },
    Folder {
        name: String,
        path: String,
        children: Vec<TreeNode>,
        /// Stands in for a directory whose contents are not listed.
        /// `hidden` counts the files behind it.
        placeholder: bool,
        hidden: usize,
    },
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::File { name, .. } | TreeNode::Folder { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            TreeNode::File { path, .. } | TreeNode::Folder { path, .. } => path,
        }
    }

    fn file(name: &str, path: &str) -> Self {
        TreeNode::File {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

/// Project tree: root files, then the components group, then one
/// placeholder per other top-level directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileTree {
    nodes: Vec<TreeNode>,
}

impl FileTree {
    pub fn from_project(project: &StructuredProject) -> Self {
        let files = project.files();
        let component_prefix = format!("{}/", COMPONENTS_DIR);

        let mut roots = Vec::new();
        let mut components = Vec::new();
        let mut others: Vec<(String, usize)> = Vec::new();

        for (path, _) in &files {
            if let Some(name) = path.strip_prefix(&component_prefix) {
                components.push(TreeNode::file(name, path));
            } else if let Some((folder, _)) = path.split_once('/') {
                match others.iter_mut().find(|(name, _)| *name == folder) {
                    Some((_, count)) => *count += 1,
                    None => others.push((folder.to_string(), 1)),
                }
            } else {
                roots.push(TreeNode::file(path, path));
            }
        }

        let mut nodes = roots;
        if !components.is_empty() {
            nodes.push(TreeNode::Folder {
                name: COMPONENTS_DIR.to_string(),
                path: COMPONENTS_DIR.to_string(),
                children: components,
                placeholder: false,
                hidden: 0,
            });
        }
        for (folder, hidden) in others {
            nodes.push(TreeNode::Folder {
                name: folder.clone(),
                path: folder,
                children: Vec::new(),
                placeholder: true,
                hidden,
            });
        }

        Self { nodes }
    }

    /// Tree for any ingested content. Legacy content shows its two files.
    pub fn from_content(content: &SiteContent) -> Self {
        match content {
            SiteContent::Structured { project, .. } => Self::from_project(project),
            SiteContent::Legacy { .. } => Self {
                nodes: LEGACY_FILES
                    .iter()
                    .map(|path| TreeNode::file(path, path))
                    .collect(),
            },
        }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Flatten the tree into display lines. Folder children only appear when
    /// the folder is expanded; placeholders never expand.
    pub fn lines(&self, state: &ExplorerState) -> Vec<TreeLine> {
        let mut lines = Vec::new();
        for node in &self.nodes {
            push_lines(node, 0, state, &mut lines);
        }
        lines
    }
}

const LEGACY_FILES: [&str; 2] = ["index.html", "styles.css"];

/// One rendered row of the tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLine {
    pub depth: usize,
    pub name: String,
    pub path: String,
    pub kind: LineKind,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    File,
    Folder { expanded: bool, hidden: usize },
}

fn push_lines(node: &TreeNode, depth: usize, state: &ExplorerState, lines: &mut Vec<TreeLine>) {
    match node {
        TreeNode::File { name, path } => lines.push(TreeLine {
            depth,
            name: name.clone(),
            path: path.clone(),
            kind: LineKind::File,
            selected: state.selected() == Some(path.as_str()),
        }),
        TreeNode::Folder {
            name,
            path,
            children,
            placeholder,
            hidden,
        } => {
            let expanded = !placeholder && state.is_expanded(path);
            lines.push(TreeLine {
                depth,
                name: name.clone(),
                path: path.clone(),
                kind: LineKind::Folder {
                    expanded,
                    hidden: *hidden,
                },
                selected: false,
            });
            if expanded {
                for child in children {
                    push_lines(child, depth + 1, state, lines);
                }
            }
        }
    }
}

/// Expanded folders and the selected file
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerState {
    expanded: BTreeSet<String>,
    selected: Option<String>,
}

impl Default for ExplorerState {
    fn default() -> Self {
        let mut expanded = BTreeSet::new();
        expanded.insert(COMPONENTS_DIR.to_string());
        Self {
            expanded,
            selected: None,
        }
    }
}

impl ExplorerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a folder and return whether it is now expanded
    pub fn toggle(&mut self, folder: &str) -> bool {
        if self.expanded.remove(folder) {
            false
        } else {
            self.expanded.insert(folder.to_string());
            true
        }
    }

    pub fn is_expanded(&self, folder: &str) -> bool {
        self.expanded.contains(folder)
    }

    pub fn select(&mut self, path: impl Into<String>) {
        self.selected = Some(path.into());
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

/// Read-only source viewer over every file of an artifact
#[derive(Debug, Clone, PartialEq)]
pub struct CodeViewer {
    files: Vec<(String, String)>,
    selected: Option<String>,
}

impl CodeViewer {
    pub fn new(content: &SiteContent) -> Self {
        let files = match content {
            SiteContent::Structured { project, .. } => project
                .files()
                .into_iter()
                .map(|(path, source)| (path, source.to_string()))
                .collect(),
            SiteContent::Legacy { html, css } => vec![
                (LEGACY_FILES[0].to_string(), html.clone()),
                (LEGACY_FILES[1].to_string(), css.clone()),
            ],
        };
        Self {
            files,
            selected: None,
        }
    }

    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|(p, _)| p.as_str()).collect()
    }

    /// Select a file; unknown paths are rejected
    pub fn select(&mut self, path: &str) -> Result<()> {
        if self.files.iter().any(|(p, _)| p == path) {
            self.selected = Some(path.to_string());
            Ok(())
        } else {
            Err(SiteError::NotFound(format!("file {}", path)))
        }
    }

    /// Selected file, else the first file, else the primary page
    pub fn current_path(&self) -> &str {
        self.selected
            .as_deref()
            .or_else(|| self.files.first().map(|(p, _)| p.as_str()))
            .unwrap_or(PRIMARY_PAGE)
    }

    /// Raw contents of the current file; empty when it does not exist
    pub fn current_source(&self) -> &str {
        let current = self.current_path();
        self.files
            .iter()
            .find(|(p, _)| p == current)
            .map(|(_, s)| s.as_str())
            .unwrap_or_default()
    }

    pub fn current_language(&self) -> &'static str {
        language_for(self.current_path())
    }

    /// `(file name, contents)` to save the current file on its own
    pub fn download(&self) -> (String, String) {
        let path = self.current_path();
        let name = path.rsplit('/').next().unwrap_or(path);
        (name.to_string(), self.current_source().to_string())
    }
}

/// Syntax name for a path, by extension
pub fn language_for(path: &str) -> &'static str {
    match extension(path) {
        "tsx" | "ts" => "typescript",
        "jsx" | "js" => "javascript",
        "css" => "css",
        "json" => "json",
        _ => "text",
    }
}

/// Display icon for a path, by extension
pub fn icon_for(path: &str) -> &'static str {
    match extension(path) {
        "tsx" | "jsx" => "⚛️",
        "css" => "🎨",
        "json" => "📋",
        _ => "📄",
    }
}

fn extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext,
        _ => "",
    }
}
