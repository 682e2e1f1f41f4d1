#![warn(missing_docs)]
// Allow pedantic strict lints that create false positives in this codebase
#![allow(clippy::arithmetic_side_effects)] // Simple counters and size calculations cannot overflow
#![allow(clippy::float_arithmetic)] // Required for file size formatting
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # cfgsync - Redundant Configuration Synchronizer
//!
//! cfgsync keeps configuration files that live in two or more locations (for
//! example a portable install and a main install) in step, by propagating the
//! most recently modified copy of each file.
//!
//! ## Synchronization regimes
//!
//! - **New files**: a file found in only one location is copied everywhere it is missing
//! - **Automatic files**: low-risk root files are replaced by their newest copy without asking
//! - **Interactive folders**: diverging copies are listed and the operator picks the winner
//! - **Section merge**: only whitelisted `[Section]`s of the main settings file are merged,
//!   every other setting in each location stays as it was
//!
//! ## Architecture
//!
//! - [`scanner`]: inventory of every copy of every file across locations
//! - [`conflicts`]: per-file classification into a [`conflicts::SyncDecision`]
//! - [`document`]: section-addressable settings documents
//! - [`sync`]: the pass that executes decisions (or simulates them in a dry run)
//! - [`prompt`]: operator prompts behind the [`prompt::Prompter`] trait
//! - [`output`]: console styling and the audit log
//! - [`config`]: TOML configuration, parsing and validation
//!
//! ## Example Usage
//!
//! ```no_run
//! use cfgsync::SyncContext;
//! use cfgsync::output::MemoryLog;
//! use cfgsync::prompt::NewestPrompter;
//! use cfgsync::sync::{RunOptions, Synchronizer};
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = SyncContext::new(cfgsync::config::default_config_path())?;
//! ctx.check_locations()?;
//!
//! let options = RunOptions { dry_run: true, verbose: false };
//! let mut sync = Synchronizer::new(&ctx.config, options, MemoryLog::new(), NewestPrompter);
//! let summary = sync.run_pass();
//! println!("changed: {}", summary.changed());
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Command implementations behind the CLI.
pub mod commands;

/// Configuration parsing, validation, and management.
pub mod config;

/// Per-file conflict detection and resolution policy.
pub mod conflicts;

/// Unified diff previews for dry-run section merges.
pub mod diff;

/// Section-addressable settings documents.
pub mod document;

/// Per-file error taxonomy.
pub mod error;

/// Console output and the audit log.
pub mod output;

/// Operator prompts.
pub mod prompt;

/// Inventory of file copies across locations.
pub mod scanner;

/// The synchronization pass.
pub mod sync;

/// Utility functions and helpers.
pub mod utils;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Current version of the cfgsync binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the configuration file path.
pub const CONFIG_ENV: &str = "CFGSYNC_CONFIG";

/// Central context for cfgsync commands.
///
/// Holds the configuration file path and the configuration loaded from it.
///
/// ```no_run
/// use cfgsync::SyncContext;
///
/// # fn main() -> anyhow::Result<()> {
/// let ctx = SyncContext::new("/tmp/cfgsync/config.toml".into())?;
/// println!("{} locations", ctx.config.locations.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SyncContext {
    /// Path to the configuration file.
    pub config_path: PathBuf,

    /// Loaded configuration settings.
    pub config: config::Config,
}

impl SyncContext {
    /// Loads the configuration at `config_path`, creating a default one if it
    /// does not exist yet, and warns about unknown keys.
    ///
    /// # Errors
    /// Returns an error if the configuration file cannot be read, created or parsed.
    pub fn new(config_path: PathBuf) -> Result<Self> {
        let config = config::Config::load(&config_path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_path.display()
            )
        })?;

        let validator = config::validator::ConfigValidator::new();
        if let Err(e) = validator.validate_config_file(&config_path) {
            eprintln!("Warning: Configuration validation failed: {e}");
        }
        config::validator::ConfigValidator::warn_sparse_locations(&config);

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Checks that there is something to synchronize.
    ///
    /// # Errors
    /// Returns an error if fewer than two locations are configured.
    pub fn check_locations(&self) -> Result<()> {
        if self.config.locations.len() < 2 {
            return Err(anyhow::anyhow!(
                "At least two locations must be configured in {}",
                self.config_path.display()
            ));
        }
        Ok(())
    }
}
