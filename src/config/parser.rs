use super::Config;
use crate::utils::expand_tilde;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// Read, parse and validate a configuration file
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid UTF-8 or TOML,
/// or fails validation.
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read config file: {path:?}"))?;

    let content = simdutf8::basic::from_utf8(&bytes)
        .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in config file {path:?}: {e}"))?;

    parse_config_str(content)
}

/// Parse configuration text, expand `~/` in location paths and validate
///
/// # Errors
///
/// Returns an error if the TOML is malformed or validation fails.
pub fn parse_config_str(content: &str) -> Result<Config> {
    let mut config: Config =
        toml::from_str(content).with_context(|| "Failed to parse TOML config")?;

    for location in &mut config.locations {
        location.path = expand_tilde(&location.path.to_string_lossy())?;
    }
    if let Some(file) = config.log.file.take() {
        config.log.file = Some(expand_tilde(&file.to_string_lossy())?);
    }

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<()> {
    let mut names = HashSet::new();
    let mut paths = HashSet::new();

    for location in &config.locations {
        if location.name.trim().is_empty() {
            anyhow::bail!("Location names cannot be empty");
        }
        if location.path.as_os_str().is_empty() {
            anyhow::bail!("Location '{}' has an empty path", location.name);
        }
        if !names.insert(location.name.as_str()) {
            anyhow::bail!("Duplicate location name: {}", location.name);
        }
        if !paths.insert(location.path.as_path()) {
            anyhow::bail!(
                "Location '{}' repeats path {}",
                location.name,
                location.path.display()
            );
        }
    }

    for file in &config.targets.root_files {
        if file.is_empty() || file.contains(['/', '\\']) {
            anyhow::bail!("Root files must be plain file names: '{file}'");
        }
    }

    for folder in &config.targets.folders {
        if Path::new(folder).is_absolute() || folder.split(['/', '\\']).any(|c| c == "..") {
            anyhow::bail!("Folders must be relative to the location root: '{folder}'");
        }
    }

    if config.merge.file.contains(['/', '\\']) {
        anyhow::bail!(
            "Merge file must be a plain file name: '{}'",
            config.merge.file
        );
    }

    if config.merge.sections.iter().any(|s| s.trim().is_empty()) {
        anyhow::bail!("Merge section names cannot be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_minimal_config() -> Result<()> {
        let config = parse_config_str(
            r#"
[[locations]]
name = "Notebook Config"
path = "/mnt/portable/REAPER"

[[locations]]
name = "Main Config"
path = "/home/user/.config/REAPER"
"#,
        )?;

        assert_eq!(config.locations.len(), 2);
        assert_eq!(config.locations[0].name, "Notebook Config");
        assert_eq!(config.targets.folders.len(), 7);
        assert_eq!(config.merge.file, "REAPER.ini");
        Ok(())
    }

    #[test]
    fn test_duplicate_location_names_rejected() {
        let result = parse_config_str(
            r#"
[[locations]]
name = "Main"
path = "/a"

[[locations]]
name = "Main"
path = "/b"
"#,
        );
        let err = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("Duplicate location name"));
    }

    #[test]
    fn test_duplicate_location_paths_rejected() {
        let result = parse_config_str(
            r#"
[[locations]]
name = "One"
path = "/a"

[[locations]]
name = "Two"
path = "/a"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_nested_root_file_rejected() {
        let result = parse_config_str(
            r#"
[targets]
root_files = ["sub/REAPER.ini"]
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_escaping_folder_rejected() {
        let result = parse_config_str(
            r#"
[targets]
folders = ["../outside"]
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_section_rejected() {
        let result = parse_config_str(
            r#"
[merge]
file = "REAPER.ini"
sections = ["Recent", " "]
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_tilde_expanded_in_location_paths() -> Result<()> {
        let config = parse_config_str(
            r#"
[[locations]]
name = "Home"
path = "~/REAPER"
"#,
        )?;

        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.locations[0].path, home.join("REAPER"));
        }
        Ok(())
    }

    #[test]
    fn test_parse_config_file_rejects_invalid_utf8() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, [0xff, 0xfe, 0x00])?;

        assert!(parse_config_file(&path).is_err());
        Ok(())
    }
}
