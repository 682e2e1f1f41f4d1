use crate::config::Config;
use crate::output::Console;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

/// Write a default configuration file
///
/// # Errors
///
/// Returns an error if:
/// - A configuration already exists and `force` is not set
/// - The configuration file cannot be written
pub fn execute(config_path: &Path, force: bool, console: Console) -> Result<()> {
    if config_path.exists() && !force {
        return Err(anyhow::anyhow!(
            "Configuration already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }

    Config::default()
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    console.success(&format!(
        "Wrote default configuration to {}",
        config_path.display()
    ));

    if console.verbosity() != crate::output::Verbosity::Quiet {
        println!("\n{}", "Next steps:".bold());
        println!("  Add at least two [[locations]] entries (name and path) to the file");
        println!("  cfgsync status           # See what a pass would do");
        println!("  cfgsync sync --dry-run   # Log the changes without making them");
    }

    Ok(())
}
