//! Output formatting and the audit log sink.
//!
//! - Dimmed colors for routine messages
//! - Bold colors for warnings and errors
//! - Verbosity control (quiet, normal, verbose) carried by value, not globally

/// Timestamped audit log sinks.
pub mod audit;

pub use audit::{AuditLog, Logger, MemoryLog};

use colored::Colorize;

/// Verbosity level for console messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Suppress informational messages, show only warnings and errors.
    Quiet,
    /// Default verbosity level, show all standard messages.
    #[default]
    Normal,
    /// Echo every audit log line in addition to standard output.
    Verbose,
}

impl Verbosity {
    /// Resolve command-line flags; `quiet` wins over `verbose`
    #[must_use]
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Whether extra detail should be shown
    #[must_use]
    pub fn is_verbose(self) -> bool {
        self == Self::Verbose
    }
}

/// Console printer honoring a verbosity level
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    /// Level chosen at startup
    verbosity: Verbosity,
}

impl Console {
    /// Console printing at `verbosity`
    #[must_use]
    pub const fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Level this console prints at
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Prints a success message in green (respects quiet mode).
    pub fn success(&self, message: &str) {
        if self.verbosity == Verbosity::Quiet {
            return;
        }
        eprintln!("{} {}", "✓".green().bold(), message.green());
    }

    /// Prints a warning message in bold yellow (always shown).
    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow().bold());
    }

    /// Prints an informational message in dimmed color (respects quiet mode).
    pub fn info(&self, message: &str) {
        if self.verbosity == Verbosity::Quiet {
            return;
        }
        eprintln!("{} {}", "ℹ".blue().bold(), message.dimmed());
    }
}
