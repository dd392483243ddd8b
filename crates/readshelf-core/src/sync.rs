//! Shelf sync
//!
//! Ties the pieces together: fetch the shelf and scan the notes directory
//! concurrently, plan the new notes, then render and write them one by one
//! in feed order.
//!
//! A failure on one book is recorded in the [`SyncReport`] and the run
//! moves on to the next book. Nothing is retried or rolled back.
//!
//! Scanning and writing use blocking file IO, so [`Syncer::run`] moves both
//! onto the blocking thread pool. [`Syncer::apply`] itself is synchronous.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::feed::{FeedClient, FeedError};
use crate::index::{self, LocalIndex};
use crate::models::{Shelf, ShelfItem};
use crate::reconcile;
use crate::render::{self, Template, TemplateError};
use crate::vault::{self, VaultError};

/// Errors that stop a sync run before any note is written
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Goodreads user ID is not set. Set it with:\n  readshelf config set user_id <your-id>")]
    MissingUserId,

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Everything a sync run needs to know
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub user_id: String,
    pub shelf: String,
    pub notes_dir: PathBuf,
    pub template: Option<PathBuf>,
}

impl SyncSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            user_id: config.user_id.trim().to_string(),
            shelf: config.shelf.trim().to_string(),
            notes_dir: config.notes_path(),
            template: config.template_path(),
        }
    }
}

/// A note written (or, in a dry run, planned)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreatedNote {
    pub book_id: String,
    pub title: String,
    pub path: PathBuf,
}

/// A book whose note could not be written
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FailedNote {
    pub book_id: String,
    pub title: String,
    pub error: String,
}

/// Result of a sync run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Items in the feed
    pub fetched: usize,
    /// Notes written, or the notes that would be written in a dry run
    pub created: Vec<CreatedNote>,
    /// Items that already had a note
    pub skipped_existing: usize,
    /// Items repeated within the feed
    pub duplicates: usize,
    pub failed: Vec<FailedNote>,
    pub dry_run: bool,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs syncs for one set of settings
#[derive(Debug, Clone)]
pub struct Syncer {
    settings: SyncSettings,
    base_url: Option<String>,
}

impl Syncer {
    pub fn new(settings: SyncSettings) -> Self {
        Self {
            settings,
            base_url: None,
        }
    }

    /// Fetch from a host other than goodreads.com
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Run a full sync
    ///
    /// With `dry_run` nothing is written; the report lists the notes that
    /// would be created.
    pub async fn run(&self, dry_run: bool) -> Result<SyncReport, SyncError> {
        if self.settings.user_id.is_empty() {
            return Err(SyncError::MissingUserId);
        }

        // Fail on a bad template before touching the network
        let template = Template::from_config(self.settings.template.as_deref())?;

        let mut client = FeedClient::new()?;
        if let Some(ref base_url) = self.base_url {
            client = client.with_base_url(base_url.clone());
        }

        let notes_dir = self.settings.notes_dir.clone();
        let (shelf, index) = tokio::join!(
            client.fetch_shelf(&self.settings.user_id, &self.settings.shelf),
            tokio::task::spawn_blocking(move || index::scan(&notes_dir)),
        );

        let shelf = shelf?;
        let index = index.map_err(|e| SyncError::Task(e.to_string()))??;

        let syncer = self.clone();
        tokio::task::spawn_blocking(move || syncer.apply(&shelf, &index, &template, dry_run))
            .await
            .map_err(|e| SyncError::Task(e.to_string()))
    }

    /// Reconcile an already-fetched shelf against an index and write the
    /// new notes
    ///
    /// Blocks on file IO; async callers should go through [`Syncer::run`].
    pub fn apply(
        &self,
        shelf: &Shelf,
        index: &LocalIndex,
        template: &Template,
        dry_run: bool,
    ) -> SyncReport {
        let plan = reconcile::plan(&shelf.items, index);
        info!(
            "{} new, {} already imported, {} duplicate(s) in feed",
            plan.new.len(),
            plan.existing.len(),
            plan.duplicates.len()
        );

        let mut report = SyncReport {
            fetched: shelf.items.len(),
            skipped_existing: plan.existing.len(),
            duplicates: plan.duplicates.len(),
            dry_run,
            ..Default::default()
        };

        for item in plan.new {
            match self.write_note(item, template, dry_run) {
                Ok(path) => {
                    debug!("Created {:?} for book {}", path, item.book_id);
                    report.created.push(CreatedNote {
                        book_id: item.book_id.clone(),
                        title: item.title.clone(),
                        path,
                    });
                }
                Err(e) => {
                    warn!("Failed to create note for {:?}: {}", item.title, e);
                    report.failed.push(FailedNote {
                        book_id: item.book_id.clone(),
                        title: item.title.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report
    }

    fn write_note(
        &self,
        item: &ShelfItem,
        template: &Template,
        dry_run: bool,
    ) -> Result<PathBuf, SyncError> {
        let content = template.render(item)?;
        let dir = &self.settings.notes_dir;
        let file_name = render::note_file_name(item);

        if dry_run {
            // Report the name a real run would end up using
            let path = dir.join(&file_name);
            if path.exists() {
                return Ok(dir.join(render::disambiguated_file_name(item)));
            }
            return Ok(path);
        }

        match vault::create_note(dir, &file_name, &content) {
            Err(VaultError::AlreadyExists { path }) => {
                // Another book (or a hand-written note) already has this title
                let alternative = render::disambiguated_file_name(item);
                info!(
                    "{:?} is taken, writing book {} as {:?}",
                    path, item.book_id, alternative
                );
                Ok(vault::create_note(dir, &alternative, &content)?)
            }
            result => Ok(result?),
        }
    }
}
