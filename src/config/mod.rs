/// Reading and structural checks of the TOML file
pub mod parser;
/// Warnings for unknown keys and sparse location lists
pub mod validator;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Configuration file name inside the cfgsync config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Everything a pass needs: where the copies live and what to sync
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Root directories holding redundant copies, in comparison order
    #[serde(default)]
    pub locations: Vec<Location>,

    /// Folders, root files and ignore patterns
    #[serde(default)]
    pub targets: TargetsConfig,

    /// Section-merged settings file
    #[serde(default)]
    pub merge: MergeConfig,

    /// Audit log settings
    #[serde(default)]
    pub log: LogConfig,
}

/// A named root directory holding one copy of the synchronized tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Human label shown in logs and prompts, e.g. "Main Config"
    pub name: String,
    /// Root directory; `~/` is expanded when the configuration is loaded
    pub path: PathBuf,
}

impl Location {
    /// Location labelled `name` rooted at `path`
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Directory for `folder` under this location (the root itself for `""`)
    #[must_use]
    pub fn folder_path(&self, folder: &str) -> PathBuf {
        if folder.is_empty() {
            self.path.clone()
        } else {
            self.path.join(folder)
        }
    }
}

/// What is synchronized under each location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetsConfig {
    /// Subfolders scanned recursively and resolved interactively
    #[serde(default = "default_folders")]
    pub folders: Vec<String>,
    /// Files directly under each location root, resolved automatically
    #[serde(default = "default_root_files")]
    pub root_files: Vec<String>,
    /// Paths skipped while walking folders (`*.bak`, `Backups/`)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

/// The root file whose named sections are merged instead of copied whole
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// File name under each location root
    #[serde(default = "default_merge_file")]
    pub file: String,
    /// Section names merged from the newest copy, in order. Empty disables merging.
    #[serde(default = "default_merge_sections")]
    pub sections: Vec<String>,
}

/// Audit log settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LogConfig {
    /// Audit log destination; defaults to the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            folders: default_folders(),
            root_files: default_root_files(),
            ignore_patterns: Vec::new(),
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            file: default_merge_file(),
            sections: default_merge_sections(),
        }
    }
}

impl MergeConfig {
    /// Whether `name` designates the section-mergeable file
    #[must_use]
    pub fn is_merge_file(&self, name: &str) -> bool {
        self.is_enabled() && name.eq_ignore_ascii_case(&self.file)
    }

    /// Whether both a file and at least one section are configured
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.file.is_empty() && !self.sections.is_empty()
    }
}

impl LogConfig {
    /// Resolved audit log path
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(default_log_path)
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot read or parse the configuration file
    /// - Configuration file fails validation
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            // Create default config if it doesn't exist
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        parser::parse_config_file(path)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot write to the file
    /// - TOML serialization fails
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(toml_str.as_bytes())?;
        Ok(())
    }

    /// Root files resolved without operator interaction (everything but the merge file)
    #[must_use]
    pub fn auto_root_files(&self) -> Vec<String> {
        self.targets
            .root_files
            .iter()
            .filter(|name| !self.merge.is_merge_file(name))
            .cloned()
            .collect()
    }

    /// Subfolders to scan recursively, skipping any empty (root) entry
    pub fn folders(&self) -> impl Iterator<Item = &str> {
        self.targets
            .folders
            .iter()
            .map(String::as_str)
            .filter(|folder| !folder.is_empty())
    }
}

/// Default configuration file path (`~/.config/cfgsync/config.toml`)
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cfgsync")
        .join(CONFIG_FILE_NAME)
}

fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cfgsync")
        .join("sync.log")
}

fn default_folders() -> Vec<String> {
    [
        "FXChains",
        "Configurations",
        "KeyMaps",
        "presets",
        "ProjectTemplates",
        "TrackTemplates",
        "UserPlugins",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_root_files() -> Vec<String> {
    [
        "REAPER.ini",
        "reaper-fxfolders.ini",
        "reaper-fxtags.ini",
        "reaper-recentfx.ini",
        "reaper-screensets.ini",
        "reaper-themeconfig.ini",
        "reaper-vkbmap.txt",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_merge_file() -> String {
    "REAPER.ini".to_string()
}

fn default_merge_sections() -> Vec<String> {
    vec!["Recent".to_string(), "RecentFX".to_string()]
}
