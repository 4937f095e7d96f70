//! Application configuration management

use std::path::PathBuf;

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Last content directory loaded by the binary
    #[serde(default)]
    pub last_content_dir: Option<PathBuf>,
    /// Virtual file system settings
    #[serde(default)]
    pub vfs: VfsConfig,
    /// Terminal session settings
    #[serde(default)]
    pub terminal: TerminalConfig,
}

/// Settings shared by the tree builder and the path resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VfsConfig {
    /// Symbol naming the root directory
    pub home_symbol: String,
    /// Word accepted in place of the home symbol at the start of a path
    pub home_alias: String,
    /// Prefix stripped from document source paths
    pub content_root: String,
    /// Document extension, without the dot
    pub extension: String,
    /// Display name rules for files
    pub display: DisplayRules,
}

/// Rule table mapping a document file name to its display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayRules {
    /// Stem that always maps to `sentinel_display`
    pub sentinel: String,
    pub sentinel_display: String,
    /// Top-level directory whose files get `journal_suffix`
    pub journal_category: String,
    pub journal_suffix: String,
    /// Top-level directory whose files keep their bare stem
    pub skills_category: String,
}

/// Terminal session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Prompt user name
    pub user: String,
    /// Prompt host name
    pub host: String,
    /// Maximum number of history entries kept
    pub history_limit: usize,
}

impl Default for VfsConfig {
    fn default() -> Self {
        Self {
            home_symbol: "~".to_string(),
            home_alias: "home".to_string(),
            content_root: "/src/content/".to_string(),
            extension: "md".to_string(),
            display: DisplayRules::default(),
        }
    }
}

impl Default for DisplayRules {
    fn default() -> Self {
        Self {
            sentinel: "about".to_string(),
            sentinel_display: "about-me.xr".to_string(),
            journal_category: "blog".to_string(),
            journal_suffix: ".blog".to_string(),
            skills_category: "skills".to_string(),
        }
    }
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            user: "visitor".to_string(),
            host: "termfolio".to_string(),
            history_limit: 500,
        }
    }
}

impl VfsConfig {
    /// Suffix appended to files outside the special categories
    pub fn default_suffix(&self) -> String {
        format!(".{}", self.extension)
    }

    /// Strip the document extension from a file name, if present
    pub fn strip_extension<'a>(&self, name: &'a str) -> &'a str {
        name.strip_suffix(&self.default_suffix()).unwrap_or(name)
    }

    /// Compute the display name of a file.
    ///
    /// `stem` is the file name with the extension already stripped and
    /// `category` is the top-level directory the file lives under, if any.
    pub fn display_name(&self, stem: &str, category: Option<&str>) -> String {
        let rules = &self.display;
        if stem == rules.sentinel {
            return rules.sentinel_display.clone();
        }

        match category {
            Some(c) if c == rules.journal_category => format!("{}{}", stem, rules.journal_suffix),
            Some(c) if c == rules.skills_category => stem.to_string(),
            _ => format!("{}{}", stem, self.default_suffix()),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "termfolio", "Termfolio")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from JSON, filling missing fields with defaults
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }
}
