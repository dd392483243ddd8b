//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/readshelf/config.toml)
//! 3. Environment variables (READSHELF_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "READSHELF";

/// Keys accepted by `config set`
pub const CONFIG_KEYS: &[&str] = &["user_id", "shelf", "notes_dir", "template", "log_file"];

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Goodreads user ID (the number in your profile URL, e.g. `12345678-jane`)
    #[serde(default)]
    pub user_id: String,

    /// Shelf to import from
    #[serde(default = "default_shelf")]
    pub shelf: String,

    /// Directory the book notes are written to
    #[serde(default = "default_notes_dir")]
    pub notes_dir: PathBuf,

    /// Note template (optional, built-in front matter is used otherwise)
    #[serde(default)]
    pub template: Option<PathBuf>,

    /// Log file (optional, logs go to stderr otherwise)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            shelf: default_shelf(),
            notes_dir: default_notes_dir(),
            template: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (READSHELF_USER_ID, READSHELF_SHELF, ...)
    /// 2. Config file (~/.config/readshelf/config.toml or READSHELF_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_USER_ID", ENV_PREFIX)) {
            self.user_id = val;
        }

        if let Ok(val) = std::env::var(format!("{}_SHELF", ENV_PREFIX)) {
            if !val.is_empty() {
                self.shelf = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_NOTES_DIR", ENV_PREFIX)) {
            if !val.is_empty() {
                self.notes_dir = PathBuf::from(val);
            }
        }

        // Empty string clears it
        if let Ok(val) = std::env::var(format!("{}_TEMPLATE", ENV_PREFIX)) {
            self.template = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
    }

    /// Set a value by key, as used by `config set`
    ///
    /// Optional keys are cleared by an empty value or `none`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let optional = |value: &str| {
            if value.is_empty() || value == "none" {
                None
            } else {
                Some(PathBuf::from(value))
            }
        };

        match key {
            "user_id" => self.user_id = value.trim().to_string(),
            "shelf" => self.shelf = value.trim().to_string(),
            "notes_dir" => self.notes_dir = PathBuf::from(value),
            "template" => self.template = optional(value),
            "log_file" => self.log_file = optional(value),
            _ => anyhow::bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                CONFIG_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with READSHELF_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("readshelf")
            .join("config.toml")
    }

    /// Notes directory with a leading `~` expanded
    pub fn notes_path(&self) -> PathBuf {
        expand_home(&self.notes_dir)
    }

    /// Template path with a leading `~` expanded
    pub fn template_path(&self) -> Option<PathBuf> {
        self.template.as_deref().map(expand_home)
    }
}

fn default_shelf() -> String {
    "read".to_string()
}

fn default_notes_dir() -> PathBuf {
    PathBuf::from("books")
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
