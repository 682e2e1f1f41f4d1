//! Discovery of every physical copy of every file in a folder, across locations.
//!
//! The inventory is keyed by the path relative to the scanned folder, which is
//! the join key between locations. Each key maps to the copies found, in the
//! order the locations were supplied.

use crate::config::Location;
use crate::error::SyncError;
use crate::utils::{paths::normalize_to_relative, should_ignore};
use std::collections::BTreeMap;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Metadata snapshot taken when a copy is discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileProperties {
    /// Length in bytes
    pub size: u64,
    /// Last modification time, the recency key
    pub modified: SystemTime,
    /// Birth time, when the platform reports one. Never used for comparison.
    pub created: Option<SystemTime>,
}

impl FileProperties {
    /// Build properties from a metadata call
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot report a modification time
    pub fn from_metadata(metadata: &Metadata) -> std::io::Result<Self> {
        Ok(Self {
            size: metadata.len(),
            modified: metadata.modified()?,
            created: metadata.created().ok(),
        })
    }

    /// The pair two copies must share to be considered in sync
    #[must_use]
    pub const fn signature(&self) -> (u64, SystemTime) {
        (self.size, self.modified)
    }

    /// Whether `other` has the same size and modification time
    #[must_use]
    pub fn same_content_as(&self, other: &Self) -> bool {
        self.signature() == other.signature()
    }
}

/// One physical instance of a logical file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCopy {
    /// Absolute path of this copy
    pub path: PathBuf,
    /// Metadata captured during the scan
    pub properties: FileProperties,
    /// Location whose tree holds this copy
    pub location: Location,
}

/// Result of scanning one folder across all locations
#[derive(Debug, Default)]
pub struct Inventory {
    /// Relative path to the copies found, in location order
    pub files: BTreeMap<PathBuf, Vec<FileCopy>>,
    /// Folders and files that were skipped, with the reason
    pub skipped: Vec<SyncError>,
}

impl Inventory {
    /// Number of distinct relative paths
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no file was found anywhere
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn record(&mut self, relative: PathBuf, path: PathBuf, location: &Location) {
        match fs::metadata(&path).and_then(|m| FileProperties::from_metadata(&m)) {
            Ok(properties) => {
                trace!(path = %path.display(), size = properties.size, "Inventoried copy");
                self.files.entry(relative).or_default().push(FileCopy {
                    path,
                    properties,
                    location: location.clone(),
                });
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Copy vanished before stat");
                self.skipped.push(SyncError::Vanished { path });
            }
        }
    }
}

/// Inventory `folder` under every location.
///
/// When `folder` is the root (`""`) and `restrict_to` is given, only those file
/// names directly under each root are considered. Otherwise the folder is walked
/// recursively. Locations lacking the folder are recorded in
/// [`Inventory::skipped`] and otherwise ignored.
#[must_use]
pub fn collect(
    folder: &str,
    locations: &[Location],
    restrict_to: Option<&[String]>,
    ignore_patterns: &[String],
) -> Inventory {
    let mut inventory = Inventory::default();

    for location in locations {
        let folder_path = location.folder_path(folder);
        if !folder_path.is_dir() {
            debug!(location = %location.name, folder = %folder_path.display(), "Folder absent");
            inventory.skipped.push(SyncError::NotFound { path: folder_path });
            continue;
        }

        match restrict_to {
            Some(names) if folder.is_empty() => {
                collect_named(&mut inventory, &folder_path, names, location);
            }
            _ => collect_recursive(&mut inventory, &folder_path, ignore_patterns, location),
        }
    }

    debug!(
        folder,
        files = inventory.len(),
        skipped = inventory.skipped.len(),
        "Inventory complete"
    );
    inventory
}

fn collect_named(inventory: &mut Inventory, root: &Path, names: &[String], location: &Location) {
    for name in names {
        let path = root.join(name);
        if path.is_file() {
            inventory.record(PathBuf::from(name), path, location);
        }
    }
}

fn collect_recursive(
    inventory: &mut Inventory,
    root: &Path,
    ignore_patterns: &[String],
    location: &Location,
) {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.path() == root || !should_ignore(&normalize_to_relative(e.path(), root), ignore_patterns)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                inventory.skipped.push(SyncError::io(path, source));
                continue;
            }
        };

        // Linked files are synced by content; linked directories are not descended
        let file_type = entry.file_type();
        if !file_type.is_file() && !(file_type.is_symlink() && !entry.path().is_dir()) {
            continue;
        }

        let relative = normalize_to_relative(entry.path(), root);
        inventory.record(relative, entry.into_path(), location);
    }
}
