//! Command-line interface definitions for cfgsync.
//!
//! The CLI definitions are shared between the main binary and build tools
//! (like xtask) for man page generation.
//!
//! Note: Field-level documentation is provided via clap attributes, so we
//! allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for cfgsync.
#[derive(Parser)]
#[command(
    name = "cfgsync",
    version = crate::VERSION,
    about = "Keep redundant configuration folders in sync",
    long_about = "Synchronizes configuration files kept in two or more locations, \
                  propagating the newest copy of each file and merging selected \
                  sections of the main settings file"
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `sync`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Echo every audit log line to the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file to use
    #[arg(long, global = true, env = crate::CONFIG_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Audit log file, overriding `log.file` from the configuration
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run one synchronization pass
    Sync {
        /// Log every change instead of making it
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Always keep the newest copy instead of asking
        #[arg(short = 'y', long)]
        yes: bool,

        /// Wait for Enter before exiting
        #[arg(long)]
        pause: bool,
    },

    /// Show what a pass would do, without prompting or changing anything
    Status {
        /// Also list files that are already in sync
        #[arg(short, long)]
        all: bool,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Config,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Self::Sync {
            dry_run: false,
            yes: false,
            pause: false,
        }
    }
}
