//! Per-file error taxonomy for a synchronization pass.
//!
//! None of these abort a pass. The orchestrator logs them and moves on to the
//! next logical file.

use std::path::{Path, PathBuf};

/// Result type for engine operations that act on a single file.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors raised while scanning, merging or copying a single file
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A configured folder does not exist at a location
    #[error("Folder not found: {}", path.display())]
    NotFound {
        /// The folder that was expected
        path: PathBuf,
    },

    /// A file disappeared between directory enumeration and stat
    #[error("File vanished during scan: {}", path.display())]
    Vanished {
        /// The file that could not be stat'ed
        path: PathBuf,
    },

    /// Read or write failure on a copy or a settings document
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A settings document cannot be handled as text
    #[error("Cannot merge {}: {reason}", path.display())]
    Malformed {
        /// Path to the document
        path: PathBuf,
        /// Why the document was rejected
        reason: String,
    },

    /// The operator answered a prompt with something unusable
    #[error("Invalid choice '{input}' (expected {expected})")]
    InvalidChoice {
        /// Raw operator input
        input: String,
        /// The answers that would have been accepted, e.g. `y/n` or `1-3`
        expected: String,
    },
}

impl SyncError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Reject a document that is not mergeable text
    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Whether this error only reports something that was skipped on purpose
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Vanished { .. })
    }
}
