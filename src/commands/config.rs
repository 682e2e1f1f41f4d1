use crate::SyncContext;
use anyhow::{Context, Result};
use colored::Colorize;

/// Print the effective configuration, with `~` already expanded
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized
pub fn execute(ctx: &SyncContext) -> Result<()> {
    let rendered =
        toml::to_string_pretty(&ctx.config).context("Failed to serialize configuration")?;

    println!(
        "{}",
        format!("# {}", ctx.config_path.display()).dimmed()
    );
    println!(
        "{}",
        format!("# audit log: {}", ctx.config.log.path().display()).dimmed()
    );
    print!("{rendered}");

    Ok(())
}
