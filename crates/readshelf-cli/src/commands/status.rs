//! Status command handler

use anyhow::Result;

use readshelf_core::feed::shelf_url;
use readshelf_core::{index, Config};

use crate::output::{or_not_set, Output, OutputFormat};

/// Show settings and what has been imported so far
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let notes_dir = config.notes_path();
    let index = index::scan(&notes_dir)?;
    let feed_url = shelf_url(&config.user_id, &config.shelf)
        .ok()
        .map(|url| url.to_string());

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "user_id": config.user_id,
                    "shelf": config.shelf,
                    "feed_url": feed_url,
                    "notes_dir": notes_dir,
                    "template": config.template_path(),
                    "imported": index.len(),
                    "notes_scanned": index.notes_scanned(),
                    "skipped": index.skipped()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", index.len());
        }
        OutputFormat::Human => {
            println!("readshelf Status");
            println!("================");
            println!();
            println!("Goodreads:");
            println!("  User:  {}", or_not_set(non_empty(&config.user_id)));
            println!("  Shelf: {}", config.shelf);
            println!("  Feed:  {}", or_not_set(feed_url));
            println!();
            println!("Notes:");
            println!("  Location: {}", notes_dir.display());
            println!(
                "  Template: {}",
                or_not_set(config.template_path().map(|p| p.display().to_string()))
            );
            println!();
            println!("Contents:");
            println!("  Imported books: {}", index.len());
            println!("  Notes scanned:  {}", index.notes_scanned());
            if index.skipped() > 0 {
                println!("  Unreadable:     {}", index.skipped());
            }
        }
    }

    if config.user_id.trim().is_empty() {
        output.warn("No Goodreads user ID set. Run: readshelf config set user_id <your-id>");
    }

    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
