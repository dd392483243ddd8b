//! readshelf Core Library
//!
//! This crate provides the core functionality for readshelf, which imports
//! the books on a Goodreads shelf into a directory of Markdown notes.
//!
//! # Architecture
//!
//! A sync run fetches the shelf's RSS feed and scans the notes directory at
//! the same time, works out which books have no note yet, and writes one
//! note per new book. Existing notes are never touched.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let syncer = Syncer::new(SyncSettings::from_config(&config));
//!
//! let report = syncer.run(false).await?;
//! println!("{} new notes", report.created.len());
//! ```
//!
//! # Modules
//!
//! - `sync`: Sync orchestration (main entry point)
//! - `feed`: Shelf URL construction, fetch and RSS parsing
//! - `index`: Scans existing notes for imported book IDs
//! - `reconcile`: Decides which shelf items are new
//! - `render`: Note templates and file naming
//! - `vault`: Note persistence
//! - `frontmatter`: YAML front matter helpers
//! - `models`: Shelf data structures
//! - `config`: Application configuration

pub mod config;
pub mod feed;
pub mod frontmatter;
pub mod index;
pub mod models;
pub mod reconcile;
pub mod render;
pub mod sync;
pub mod vault;

pub use config::Config;
pub use feed::{FeedClient, FeedError};
pub use index::LocalIndex;
pub use models::{Shelf, ShelfItem};
pub use reconcile::SyncPlan;
pub use render::{Template, TemplateError};
pub use sync::{SyncError, SyncReport, SyncSettings, Syncer};
pub use vault::VaultError;
