//! Append-only audit log.
//!
//! Every decision a pass takes is recorded as one timestamped line. Writing is
//! best effort: a log that cannot be opened or written never stops a pass.

use chrono::Local;
use colored::Colorize;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Prefix marking actions that were only simulated
pub const DRY_RUN_TAG: &str = "[DRY RUN]";

/// Prefix marking actions taken without operator confirmation
pub const AUTO_TAG: &str = "[AUTO]";

/// Append-only sink for audit messages
pub trait Logger {
    /// Record one message. Must not fail.
    fn log(&mut self, message: &str);
}

/// Audit log appending `[YYYY-mm-dd HH:MM:SS] message` lines to a file,
/// optionally echoing them to stderr
pub struct AuditLog {
    /// Log file path, kept for diagnostics
    path: PathBuf,
    /// Open handle; `None` once opening or writing has failed
    file: Option<File>,
    /// Echo every line to the console
    echo: bool,
}

impl AuditLog {
    /// Open (or create) the log at `path` for appending
    #[must_use]
    pub fn open(path: &Path, echo: bool) -> Self {
        let file = Self::open_append(path)
            .inspect_err(|e| {
                warn!(path = %path.display(), error = %e, "Audit log unavailable, continuing without it");
            })
            .ok();

        Self {
            path: path.to_path_buf(),
            file,
            echo,
        }
    }

    /// Where the log is written
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_append(path: &Path) -> std::io::Result<File> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    }

    fn echo_line(timestamp: &str, message: &str) {
        let styled = if message.starts_with(DRY_RUN_TAG) {
            message.yellow().to_string()
        } else if message.starts_with("Error") || message.starts_with("Warning") {
            message.red().to_string()
        } else {
            message.to_string()
        };
        eprintln!("{} {styled}", timestamp.dimmed());
    }
}

impl Logger for AuditLog {
    fn log(&mut self, message: &str) {
        let timestamp = Local::now().format("[%Y-%m-%d %H:%M:%S]").to_string();

        if let Some(file) = self.file.as_mut()
            && let Err(e) = writeln!(file, "{timestamp} {message}")
        {
            warn!(path = %self.path.display(), error = %e, "Audit log write failed, disabling it");
            self.file = None;
        }

        if self.echo {
            Self::echo_line(&timestamp, message);
        }
    }
}

/// In-memory log, for tests and for collecting a pass transcript
#[derive(Debug, Default, Clone)]
pub struct MemoryLog {
    /// Messages in the order they were logged, without timestamps
    lines: Vec<String>,
}

impl MemoryLog {
    /// Empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logged messages, oldest first
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether any message contains `needle`
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl Logger for MemoryLog {
    fn log(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn log(&mut self, message: &str) {
        (**self).log(message);
    }
}
