//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use readshelf_core::SyncReport;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the result of a sync run
    pub fn print_report(&self, report: &SyncReport) {
        match self.format {
            OutputFormat::Human => {
                let verb = if report.dry_run {
                    "Would create"
                } else {
                    "Created"
                };

                for note in &report.created {
                    println!("+ {}", note.path.display());
                }
                for failed in &report.failed {
                    eprintln!("✗ {} ({}): {}", failed.title, failed.book_id, failed.error);
                }
                if !report.created.is_empty() || !report.failed.is_empty() {
                    println!();
                }

                println!(
                    "{} {} note(s) from {} book(s) on the shelf",
                    verb,
                    report.created.len(),
                    report.fetched
                );
                if report.skipped_existing > 0 {
                    println!("  {} already imported", report.skipped_existing);
                }
                if report.duplicates > 0 {
                    println!("  {} duplicate(s) in feed ignored", report.duplicates);
                }
                if !report.failed.is_empty() {
                    println!("  {} failed", report.failed.len());
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(report).unwrap_or_default()
                );
            }
            OutputFormat::Quiet => {
                for note in &report.created {
                    println!("{}", note.path.display());
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    ///
    /// Goes to stderr in JSON mode so stdout stays a single document.
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => eprintln!("{}", msg),
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning, shown in every mode but quiet
    pub fn warn(&self, msg: &str) {
        if self.format != OutputFormat::Quiet {
            eprintln!("⚠ {}", msg);
        }
    }
}

/// Text for an optional setting
pub fn or_not_set(value: Option<String>) -> String {
    value.unwrap_or_else(|| "(not set)".to_string())
}
