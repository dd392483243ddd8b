//! Config command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};

use readshelf_core::Config;

use crate::output::{or_not_set, Output, OutputFormat};

fn display_path(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.display().to_string())
}

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "user_id": config.user_id,
                    "shelf": config.shelf,
                    "notes_dir": config.notes_dir,
                    "template": config.template,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.notes_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            let user_id = if config.user_id.is_empty() {
                None
            } else {
                Some(config.user_id.clone())
            };

            println!("Configuration:");
            println!("  user_id:   {}", or_not_set(user_id));
            println!("  shelf:     {}", config.shelf);
            println!("  notes_dir: {}", config.notes_dir.display());
            println!(
                "  template:  {}",
                or_not_set(display_path(config.template.as_ref()))
            );
            println!(
                "  log_file:  {}",
                or_not_set(display_path(config.log_file.as_ref()))
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    config.set(&key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Print the config file path
pub fn path(config_path: Option<&PathBuf>) -> Result<()> {
    let path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    println!("{}", path.display());
    Ok(())
}
