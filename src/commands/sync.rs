use crate::SyncContext;
use crate::output::{AuditLog, Console};
use crate::prompt::{NewestPrompter, Prompter, StdinPrompter};
use crate::sync::{PassSummary, RunOptions, Synchronizer};
use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};

/// Flags of the `sync` command
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncArgs {
    /// Log changes instead of making them
    pub dry_run: bool,
    /// Keep the newest copy instead of prompting
    pub yes: bool,
}

/// Run one synchronization pass and report the outcome
///
/// # Errors
///
/// Returns an error if fewer than two locations are configured. Failures on
/// individual files are logged and summarized, not returned.
pub fn execute(
    ctx: &SyncContext,
    args: SyncArgs,
    log_file: Option<&Path>,
    console: Console,
) -> Result<PassSummary> {
    ctx.check_locations()?;

    let log_path = log_file.map_or_else(|| ctx.config.log.path(), Path::to_path_buf);
    let mut log = AuditLog::open(&log_path, console.verbosity().is_verbose());

    let options = RunOptions {
        dry_run: args.dry_run,
        verbose: console.verbosity().is_verbose(),
    };

    let started = Instant::now();
    let summary = if args.yes {
        run(ctx, options, &mut log, NewestPrompter)
    } else {
        run(ctx, options, &mut log, StdinPrompter::stdio())
    };
    // Whole milliseconds read better than nanosecond precision
    let elapsed = Duration::from_millis(
        u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    );

    report(&summary, args.dry_run, &log_path, console);
    console.info(&format!(
        "Pass finished in {}",
        humantime::format_duration(elapsed)
    ));

    Ok(summary)
}

fn run<P: Prompter>(
    ctx: &SyncContext,
    options: RunOptions,
    log: &mut AuditLog,
    prompter: P,
) -> PassSummary {
    Synchronizer::new(&ctx.config, options, log, prompter).run_pass()
}

fn report(summary: &PassSummary, dry_run: bool, log_path: &Path, console: Console) {
    if summary.changed() {
        let verb = if dry_run { "would be updated" } else { "updated" };
        console.success(&format!(
            "{} file{} {verb}",
            summary.changed_files,
            if summary.changed_files == 1 { "" } else { "s" }
        ));
    } else {
        console.info("Everything is in sync");
    }

    if summary.errors > 0 {
        console.warning(&format!(
            "{} file{} could not be synchronized, see {}",
            summary.errors,
            if summary.errors == 1 { "" } else { "s" },
            log_path.display()
        ));
    }
}
