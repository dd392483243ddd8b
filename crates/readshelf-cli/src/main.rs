//! readshelf CLI
//!
//! Command-line interface for readshelf - Goodreads shelf to Markdown notes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use readshelf_core::Config;

mod cli;
mod commands;
mod logging;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use output::{Output, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work on the file itself and need no logging
    if let Commands::Config { command } = cli.command {
        return handle_config_command(command, config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init(&config, cli.verbose);
    debug!("Notes directory: {:?}", config.notes_path());

    match cli.command {
        Commands::Sync(args) => commands::sync::sync(&config, args, &output).await,
        Commands::Status => commands::status::show(&config, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
        Some(ConfigCommands::Path) => commands::config::path(config_path),
    }
}
