//! Sync command handler

use anyhow::{bail, Result};

use readshelf_core::{Config, SyncSettings, Syncer};

use crate::cli::SyncArgs;
use crate::output::Output;

/// Settings for this run: config values with command-line overrides applied
pub fn settings(config: &Config, args: &SyncArgs) -> SyncSettings {
    let mut settings = SyncSettings::from_config(config);

    if let Some(ref user) = args.user {
        settings.user_id = user.trim().to_string();
    }
    if let Some(ref shelf) = args.shelf {
        settings.shelf = shelf.trim().to_string();
    }
    if let Some(ref dir) = args.dir {
        settings.notes_dir = readshelf_core::config::expand_home(dir);
    }
    if let Some(ref template) = args.template {
        settings.template = Some(readshelf_core::config::expand_home(template));
    }

    settings
}

/// Import new books from the shelf
pub async fn sync(config: &Config, args: SyncArgs, output: &Output) -> Result<()> {
    let settings = settings(config, &args);

    if !settings.user_id.is_empty() {
        output.message(&format!(
            "Importing shelf '{}' for user {}...",
            settings.shelf, settings.user_id
        ));
    }

    let report = Syncer::new(settings).run(args.dry_run).await?;
    output.print_report(&report);

    if !report.is_success() {
        bail!("{} note(s) could not be created", report.failed.len());
    }

    if !report.dry_run && !report.created.is_empty() {
        output.success(&format!("Imported {} new book(s)", report.created.len()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_settings_without_overrides() {
        let config = Config {
            user_id: "1".to_string(),
            notes_dir: PathBuf::from("/vault/Books"),
            ..Default::default()
        };

        let settings = settings(&config, &SyncArgs::default());
        assert_eq!(settings.user_id, "1");
        assert_eq!(settings.shelf, "read");
        assert_eq!(settings.notes_dir, PathBuf::from("/vault/Books"));
        assert!(settings.template.is_none());
    }

    #[test]
    fn test_settings_with_overrides() {
        let config = Config {
            user_id: "1".to_string(),
            ..Default::default()
        };
        let args = SyncArgs {
            user: Some(" 2 ".to_string()),
            shelf: Some("to-read".to_string()),
            dir: Some(PathBuf::from("/tmp/books")),
            template: Some(PathBuf::from("/tmp/book.md")),
            ..Default::default()
        };

        let settings = settings(&config, &args);
        assert_eq!(settings.user_id, "2");
        assert_eq!(settings.shelf, "to-read");
        assert_eq!(settings.notes_dir, PathBuf::from("/tmp/books"));
        assert_eq!(settings.template, Some(PathBuf::from("/tmp/book.md")));
    }
}
