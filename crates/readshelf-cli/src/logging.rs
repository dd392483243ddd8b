//! Logging setup
//!
//! Level comes from READSHELF_LOG (e.g. `debug`), `-v` means `debug`,
//! otherwise only warnings are shown. Logs go to stderr, or to
//! `log_file` when one is configured.

use std::fs::OpenOptions;
use std::sync::Mutex;

use readshelf_core::Config;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log level
const LOG_ENV: &str = "READSHELF_LOG";

fn log_level(verbose: bool) -> String {
    match std::env::var(LOG_ENV) {
        Ok(level) if !level.trim().is_empty() => level.trim().to_string(),
        _ if verbose => "debug".to_string(),
        _ => "warn".to_string(),
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("readshelf_core={0},readshelf_cli={0}", level))
}

/// Initialize logging (ignores a second call)
pub fn init(config: &Config, verbose: bool) {
    let level = log_level(verbose);

    if let Some(ref log_path) = config.log_file {
        let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
                return;
            }
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter(&level))
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(log_file))
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter(&level))
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
