use anyhow::Result;
use cfgsync::cli::{Cli, Commands};
use cfgsync::commands::sync::SyncArgs;
use cfgsync::config::default_config_path;
use cfgsync::output::{Console, Verbosity};
use cfgsync::{SyncContext, commands};
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use std::io::{self, BufRead};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let console = Console::new(Verbosity::from_flags(cli.verbose, cli.quiet));
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    match cli.command.unwrap_or_default() {
        Commands::Sync {
            dry_run,
            yes,
            pause,
        } => {
            let result = SyncContext::new(config_path).and_then(|ctx| {
                commands::sync::execute(
                    &ctx,
                    SyncArgs { dry_run, yes },
                    cli.log_file.as_deref(),
                    console,
                )
            });
            if pause {
                wait_for_enter();
            }
            result?;
        }
        Commands::Status { all } => {
            let ctx = SyncContext::new(config_path)?;
            commands::status::execute(&ctx, all, console)?;
        }
        Commands::Init { force } => {
            commands::init::execute(&config_path, force, console)?;
        }
        Commands::Config => {
            let ctx = SyncContext::new(config_path)?;
            commands::config::execute(&ctx)?;
        }
        Commands::Completion { shell } => {
            print_completions(shell, &mut Cli::command());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "cfgsync=debug" } else { "cfgsync=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn wait_for_enter() {
    eprint!("{}", "Press Enter to exit...".dimmed());
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
