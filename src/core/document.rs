//! Content documents and the loader that discovers them on disk

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use super::config::VfsConfig;

/// Source path to raw text, as handed to the tree builder
pub type DocumentSet = BTreeMap<String, String>;

/// A document placed in the virtual file system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path under the home symbol, extension stripped (e.g. `~/blog/welcome`)
    pub virtual_path: String,
    /// Trimmed text content
    pub content: String,
}

impl Document {
    /// Create a document, normalizing whitespace-only text to empty
    pub fn new(virtual_path: impl Into<String>, raw: &str) -> Self {
        Self {
            virtual_path: virtual_path.into(),
            content: raw.trim().to_string(),
        }
    }
}

/// Load every document with the configured extension below `dir`.
///
/// Keys are `content_root` followed by the path relative to `dir`, so the
/// tree builder strips them back to the same relative path.
pub fn load_documents(config: &VfsConfig, dir: &Path) -> Result<DocumentSet> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let mut documents = DocumentSet::new();
    let walker = WalkDir::new(dir).into_iter().filter_entry(|e| {
        // Skip hidden files and directories, but never the root itself
        e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.')
    });

    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = path
            .extension()
            .map(|ext| ext == config.extension.as_str())
            .unwrap_or(false);
        if !matches {
            continue;
        }

        let relative = path
            .strip_prefix(dir)
            .with_context(|| format!("Path outside content dir: {}", path.display()))?;
        let relative: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let key = format!("{}{}", config.content_root, relative.join("/"));
        tracing::debug!("Loaded document: {}", key);
        documents.insert(key, text);
    }

    tracing::info!("Loaded {} documents from {}", documents.len(), dir.display());
    Ok(documents)
}
