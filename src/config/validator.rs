use anyhow::Result;
use colored::Colorize;
use std::collections::HashSet;
use std::path::Path;

/// Fields that may appear inside each `[[locations]]` entry
const LOCATION_FIELDS: &[&str] = &["name", "path"];

/// Flags configuration keys that cfgsync does not understand
pub struct ConfigValidator {
    /// Set of valid configuration fields that are recognized by cfgsync
    known_fields: HashSet<String>,
}

impl ConfigValidator {
    /// Create a new validator with known configuration fields
    #[must_use]
    pub fn new() -> Self {
        let known_fields = [
            "targets.folders",
            "targets.root_files",
            "targets.ignore_patterns",
            "merge.file",
            "merge.sections",
            "log.file",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        Self { known_fields }
    }

    /// Validate a configuration file and print warnings about unknown keys
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn validate_config_file(&self, config_path: &Path) -> Result<()> {
        if !config_path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(config_path)?;
        let unknown = self.unknown_fields(&content)?;

        if !unknown.is_empty() {
            eprintln!("{}", "Configuration warnings:".yellow().bold());
            for field in unknown {
                eprintln!("  Unknown configuration field: {}", field.yellow());
            }
            eprintln!();
        }

        Ok(())
    }

    /// Collect the dotted paths of every unrecognized key in `content`
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid TOML
    pub fn unknown_fields(&self, content: &str) -> Result<Vec<String>> {
        let parsed: toml::Value = toml::from_str(content)?;
        let mut unknown = Vec::new();
        self.check_table(&parsed, "", &mut unknown);
        Ok(unknown)
    }

    /// Recursively checks a TOML table for unknown fields
    fn check_table(&self, table: &toml::Value, prefix: &str, unknown: &mut Vec<String>) {
        let toml::Value::Table(map) = table else {
            return;
        };

        for (key, value) in map {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            if full_key == "locations" {
                Self::check_locations(value, unknown);
                continue;
            }

            if self.known_fields.contains(&full_key) {
                continue;
            }

            if let toml::Value::Table(_) = value {
                self.check_table(value, &full_key, unknown);
            } else {
                unknown.push(full_key);
            }
        }
    }

    /// Validates the fields of every `[[locations]]` entry
    fn check_locations(value: &toml::Value, unknown: &mut Vec<String>) {
        let toml::Value::Array(entries) = value else {
            unknown.push("locations".to_string());
            return;
        };

        for (idx, entry) in entries.iter().enumerate() {
            if let toml::Value::Table(map) = entry {
                for key in map.keys() {
                    if !LOCATION_FIELDS.contains(&key.as_str()) {
                        unknown.push(format!("locations[{idx}].{key}"));
                    }
                }
            }
        }
    }

    /// Warn when the configuration cannot reconcile anything yet
    pub fn warn_sparse_locations(config: &crate::config::Config) {
        if config.locations.len() < 2 {
            eprintln!(
                "{} {}",
                "Warning:".yellow().bold(),
                "fewer than two locations are configured; nothing can be synchronized".dimmed()
            );
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
