//! Development tasks for cfgsync.

use anyhow::{Context, Result};
use clap::{Command, CommandFactory, Parser};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "xtask", about = "Development tasks for cfgsync")]
enum Task {
    /// Render man pages for cfgsync and each of its subcommands
    Man {
        /// Directory the pages are written to
        #[arg(short, long, default_value = "man")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    match Task::parse() {
        Task::Man { output } => man_pages(&output),
    }
}

fn man_pages(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let cli = cfgsync::cli::Cli::command();
    render(&cli, &dir.join("cfgsync.1"))?;

    // `completion` only prints a script; it gets no page of its own
    for sub in cli.get_subcommands().filter(|s| s.get_name() != "completion") {
        let name = format!("cfgsync-{}", sub.get_name());
        render(&sub.clone().name(&name), &dir.join(format!("{name}.1")))?;
    }

    Ok(())
}

fn render(cmd: &Command, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    clap_mangen::Man::new(cmd.clone()).render(&mut BufWriter::new(file))?;
    println!("wrote {}", path.display());
    Ok(())
}
