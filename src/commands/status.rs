use crate::SyncContext;
use crate::conflicts::SyncDecision;
use crate::output::{Console, MemoryLog};
use crate::prompt::NewestPrompter;
use crate::sync::{FileReport, RunOptions, Synchronizer};
use crate::utils::formatters::truncate_with_ellipsis;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

/// Widest path shown before it is shortened
const MAX_PATH_WIDTH: usize = 60;

/// Show what a pass would do, without prompting or touching any file
///
/// # Errors
///
/// Returns an error if fewer than two locations are configured
pub fn execute(ctx: &SyncContext, all: bool, console: Console) -> Result<()> {
    ctx.check_locations()?;

    println!("{}", "Locations:".bold());
    for location in &ctx.config.locations {
        let state = if location.path.is_dir() {
            String::new()
        } else {
            format!(" {}", "(missing)".red())
        };
        println!("  {}: {}{state}", location.name, location.path.display());
    }
    println!();

    let sync = Synchronizer::new(
        &ctx.config,
        RunOptions::default(),
        MemoryLog::new(),
        NewestPrompter,
    );
    let reports = sync.survey();
    let pending: Vec<&FileReport> = reports.iter().filter(|r| r.decision.is_action()).collect();

    if pending.is_empty() && !all {
        console.info("Everything is in sync");
        return Ok(());
    }

    for report in reports.iter().filter(|r| all || r.decision.is_action()) {
        print_report(report);
    }

    println!(
        "\n{} of {} files need attention",
        pending.len(),
        reports.len()
    );
    Ok(())
}

fn print_report(report: &FileReport) {
    let path = display_path(report);
    let path = truncate_with_ellipsis(&path, MAX_PATH_WIDTH);
    let label = format!("{:>13}", report.decision.label());

    let label = match report.decision {
        SyncDecision::NoAction => label.dimmed(),
        SyncDecision::Propagate { .. } => label.green(),
        SyncDecision::AutoReplace { .. } | SyncDecision::MergeSections { .. } => label.cyan(),
        SyncDecision::NeedsChoice { .. } => label.yellow().bold(),
    };

    println!("{label}  {path}");
    if report.decision.is_action() {
        println!("{:>13}  {}", "", report.decision.to_string().dimmed());
    }
}

fn display_path(report: &FileReport) -> String {
    let mut path = PathBuf::from(&report.folder);
    path.push(&report.relative_path);
    path.display().to_string()
}
