//! Utility functions and helpers.
//!
//! - Path manipulation (tilde expansion, relative paths)
//! - Ignore pattern matching for inventory scans
//! - Copying files with their timestamps
//! - File size and timestamp formatting
//!
//! # Examples
//!
//! ```
//! use cfgsync::utils::{expand_tilde, format_size};
//!
//! # fn main() -> anyhow::Result<()> {
//! let path = expand_tilde("~/REAPER")?;
//!
//! let size_str = format_size(1024 * 1024); // "1.00 MB"
//! # Ok(())
//! # }
//! ```

/// Output formatting for sizes and timestamps
pub mod formatters;
/// Path manipulation and resolution utilities
pub mod paths;

pub use formatters::{format_size, format_system_time};

use crate::error::{Result, SyncError};
use anyhow::bail;
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};

/// Expands a path starting with `~` to the user's home directory.
///
/// # Errors
///
/// Returns an error if the path is empty.
pub fn expand_tilde(path: &str) -> anyhow::Result<PathBuf> {
    if path.is_empty() {
        bail!("Path cannot be empty");
    }
    if let Some(home) = dirs::home_dir() {
        if path == "~" {
            return Ok(home);
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return Ok(home.join(rest));
        }
    }
    Ok(PathBuf::from(path))
}

/// Determines if a given path should be ignored based on provided patterns.
///
/// Supports `dir/`, `*suffix`, `prefix*`, `*contains*` and exact
/// file-or-component matches.
#[must_use]
pub fn should_ignore(path: &Path, patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy();

    for pattern in patterns {
        if let Some(dir_name) = pattern.strip_suffix('/') {
            if path.components().any(|c| c.as_os_str() == dir_name) {
                return true;
            }
        } else if pattern.len() > 1 && pattern.starts_with('*') && pattern.ends_with('*') {
            let search = &pattern[1..pattern.len() - 1];
            if path_str.contains(search) {
                return true;
            }
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            if path_str.ends_with(suffix) {
                return true;
            }
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            let name = path.file_name().map(|n| n.to_string_lossy());
            if path_str.starts_with(prefix) || name.is_some_and(|n| n.starts_with(prefix)) {
                return true;
            }
        } else if path_str == pattern.as_str()
            || path.components().any(|c| c.as_os_str() == pattern.as_str())
        {
            return true;
        }
    }

    false
}

/// Copy `src` over `dst`, creating parent directories and carrying the
/// source's access and modification times so both copies compare equal on
/// the next scan.
///
/// # Errors
///
/// Returns [`SyncError::Io`] naming whichever path failed.
pub fn copy_preserving_times(src: &Path, dst: &Path) -> Result<u64> {
    let metadata = fs::metadata(src).map_err(|e| SyncError::io(src, e))?;

    paths::ensure_parent_dirs(dst)?;
    let bytes = fs::copy(src, dst).map_err(|e| SyncError::io(dst, e))?;

    let mtime = FileTime::from_last_modification_time(&metadata);
    let atime = FileTime::from_last_access_time(&metadata);
    filetime::set_file_times(dst, atime, mtime).map_err(|e| SyncError::io(dst, e))?;

    Ok(bytes)
}
