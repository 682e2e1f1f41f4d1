#![allow(dead_code)]

use anyhow::Result;
use cfgsync::config::{Config, LogConfig, Location, MergeConfig, TargetsConfig};
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A modification time well in the past, in Unix seconds
pub const OLD: i64 = 1_600_000_000;

/// A modification time newer than [`OLD`]
pub const NEW: i64 = 1_700_000_000;

/// Temporary locations plus a configuration pointing at them
pub struct SyncFixture {
    pub temp_dir: TempDir,
    pub config: Config,
}

impl SyncFixture {
    /// Two locations, `Portable` and `Main`
    pub fn new() -> Result<Self> {
        Self::with_locations(&["Portable", "Main"])
    }

    pub fn with_locations(names: &[&str]) -> Result<Self> {
        let temp_dir = TempDir::new()?;

        let locations = names
            .iter()
            .map(|name| {
                let root = temp_dir.path().join(name.to_lowercase());
                fs::create_dir_all(&root)?;
                Ok(Location::new(*name, root))
            })
            .collect::<Result<Vec<_>>>()?;

        let config = Config {
            locations,
            targets: TargetsConfig {
                folders: vec!["presets".to_string(), "KeyMaps".to_string()],
                root_files: vec!["REAPER.ini".to_string(), "reaper-vkbmap.txt".to_string()],
                ignore_patterns: vec!["*.bak".to_string()],
            },
            merge: MergeConfig {
                file: "REAPER.ini".to_string(),
                sections: vec!["Recent".to_string(), "RecentFX".to_string()],
            },
            log: LogConfig {
                file: Some(temp_dir.path().join("sync.log")),
            },
        };

        Ok(Self { temp_dir, config })
    }

    /// Path of `relative` under location `index`
    pub fn path(&self, index: usize, relative: &str) -> PathBuf {
        self.config.locations[index].path.join(relative)
    }

    /// Write a file under location `index` and pin its modification time
    pub fn write(&self, index: usize, relative: &str, content: &str, mtime: i64) -> Result<PathBuf> {
        let path = self.path(index, relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        set_mtime(&path, mtime)?;
        Ok(path)
    }

    pub fn read(&self, index: usize, relative: &str) -> Result<String> {
        Ok(fs::read_to_string(self.path(index, relative))?)
    }

    /// Save the configuration next to the locations and return its path
    pub fn write_config(&self) -> Result<PathBuf> {
        let path = self.temp_dir.path().join("config.toml");
        self.config.save(&path)?;
        Ok(path)
    }

    /// Content and modification time of every file under every location
    pub fn snapshot(&self) -> Result<Vec<(PathBuf, String, FileTime)>> {
        let mut files = Vec::new();
        for location in &self.config.locations {
            for entry in walkdir::WalkDir::new(&location.path).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() {
                    let metadata = entry.metadata()?;
                    files.push((
                        entry.path().to_path_buf(),
                        fs::read_to_string(entry.path())?,
                        FileTime::from_last_modification_time(&metadata),
                    ));
                }
            }
        }
        Ok(files)
    }
}

pub fn set_mtime(path: &Path, secs: i64) -> Result<()> {
    filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0))?;
    Ok(())
}

pub fn mtime(path: &Path) -> Result<FileTime> {
    Ok(FileTime::from_last_modification_time(&fs::metadata(path)?))
}
