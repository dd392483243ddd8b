use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "readshelf")]
#[command(about = "readshelf - Import a Goodreads shelf into Markdown notes")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (same as READSHELF_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of the default one
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import new books from the shelf
    Sync(SyncArgs),
    /// Show settings and the number of imported books
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

/// Per-run overrides for the configured settings
#[derive(Args, Debug, Default, Clone)]
pub struct SyncArgs {
    /// Show what would be created without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Goodreads user ID
    #[arg(long)]
    pub user: Option<String>,

    /// Shelf name
    #[arg(long)]
    pub shelf: Option<String>,

    /// Notes directory
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Note template
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (user_id, shelf, notes_dir, template, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
    /// Print the config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_command() {
        assert!(Cli::try_parse_from(vec!["readshelf"]).is_err());
    }

    #[test]
    fn test_sync_basic() {
        let cli = Cli::try_parse_from(vec!["readshelf", "sync"]).unwrap();

        match cli.command {
            Commands::Sync(args) => {
                assert!(!args.dry_run);
                assert!(args.user.is_none());
                assert!(args.shelf.is_none());
            }
            _ => panic!("Expected Sync command"),
        }
    }

    #[test]
    fn test_sync_with_overrides() {
        let cli = Cli::try_parse_from(vec![
            "readshelf",
            "sync",
            "--dry-run",
            "--user",
            "1234-jane",
            "--shelf",
            "to-read",
            "--dir",
            "/vault/Books",
        ])
        .unwrap();

        match cli.command {
            Commands::Sync(args) => {
                assert!(args.dry_run);
                assert_eq!(args.user.as_deref(), Some("1234-jane"));
                assert_eq!(args.shelf.as_deref(), Some("to-read"));
                assert_eq!(args.dir, Some(PathBuf::from("/vault/Books")));
                assert!(args.template.is_none());
            }
            _ => panic!("Expected Sync command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(vec!["readshelf", "status", "--json", "--config", "/c.toml"])
                .unwrap();

        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("/c.toml")));
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_config_set() {
        let cli =
            Cli::try_parse_from(vec!["readshelf", "config", "set", "shelf", "favorites"]).unwrap();

        match cli.command {
            Commands::Config {
                command: Some(ConfigCommands::Set { key, value }),
            } => {
                assert_eq!(key, "shelf");
                assert_eq!(value, "favorites");
            }
            _ => panic!("Expected Config Set command"),
        }
    }

    #[test]
    fn test_config_without_subcommand() {
        let cli = Cli::try_parse_from(vec!["readshelf", "config"]).unwrap();
        assert!(matches!(cli.command, Commands::Config { command: None }));
    }
}
