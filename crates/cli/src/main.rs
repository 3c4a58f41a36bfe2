//! Project board CLI.

use anyhow::Context;
use clap::Parser;

mod cli;
mod config;
mod shell;

use crate::cli::Cli;
use crate::config::Settings;
use crate::shell::Shell;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli);
    projboard_observability::tracing::init_with(&settings.log);

    let input = settings.open_input()?;
    let mut shell = Shell::new(settings.quiet).context("failed to mount the board")?;

    let stdout = std::io::stdout();
    shell.run(input, stdout.lock())?;

    tracing::info!(projects = shell.board().state().len(), "session ended");
    Ok(())
}
