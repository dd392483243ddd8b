//! Local note index
//!
//! Scans the notes directory for Markdown files whose front matter carries
//! a `bookID`, giving the set of books that were already imported.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::frontmatter;
use crate::vault::{VaultError, VaultResult};

/// Book IDs found in existing notes
#[derive(Debug, Clone, Default)]
pub struct LocalIndex {
    ids: HashMap<String, PathBuf>,
    notes_scanned: usize,
    skipped: usize,
}

impl LocalIndex {
    /// Whether a note for this book already exists
    pub fn contains(&self, book_id: &str) -> bool {
        self.ids.contains_key(book_id.trim())
    }

    /// Path of the note holding this book ID
    pub fn note_path(&self, book_id: &str) -> Option<&Path> {
        self.ids.get(book_id.trim()).map(PathBuf::as_path)
    }

    /// Number of distinct imported book IDs
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Markdown files read during the scan
    pub fn notes_scanned(&self) -> usize {
        self.notes_scanned
    }

    /// Markdown files that could not be read, or whose front matter was
    /// malformed with no readable `bookID` line
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Record a book ID (used when building an index by hand)
    pub fn insert(&mut self, book_id: impl Into<String>, path: impl Into<PathBuf>) {
        self.ids.entry(book_id.into()).or_insert_with(|| path.into());
    }

    fn record_note(&mut self, path: &Path) {
        self.notes_scanned += 1;

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping unreadable note {:?}: {}", path, e);
                self.skipped += 1;
                return;
            }
        };

        let Some((yaml, _)) = frontmatter::split(&content) else {
            return;
        };

        match frontmatter::book_id(yaml) {
            Ok(Some(id)) => {
                if let Some(first) = self.ids.get(&id) {
                    warn!(
                        "Book {} appears in both {:?} and {:?}",
                        id,
                        first,
                        path
                    );
                } else {
                    debug!("Found book {} in {:?}", id, path);
                    self.ids.insert(id, path.to_path_buf());
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Skipping note with malformed front matter {:?}: {}", path, e);
                self.skipped += 1;
            }
        }
    }
}

/// Scan a notes directory recursively
///
/// A missing directory yields an empty index. Hidden entries (such as
/// `.obsidian` or `.git`) are not descended into.
pub fn scan(dir: &Path) -> VaultResult<LocalIndex> {
    let mut index = LocalIndex::default();

    match fs::metadata(dir) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Notes directory {:?} does not exist yet", dir);
            return Ok(index);
        }
        Err(source) => {
            return Err(VaultError::ReadError {
                path: dir.to_path_buf(),
                source,
            })
        }
    }

    walk(dir, &mut index)?;
    info!(
        "Scanned {} note(s) in {:?}, {} imported book(s)",
        index.notes_scanned,
        dir,
        index.len()
    );
    Ok(index)
}

fn walk(dir: &Path, index: &mut LocalIndex) -> VaultResult<()> {
    let read_err = |source: io::Error| VaultError::ReadError {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(read_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!("Skipping {:?}: {}", path, e);
                continue;
            }
        };

        if file_type.is_dir() {
            walk(&path, index)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            index.record_note(&path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let index = scan(&dir.path().join("not-there")).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.notes_scanned(), 0);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        let index = scan(dir.path()).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_scan_collects_ids() {
        let dir = tempdir().unwrap();
        write(
            &dir.path().join("Dune.md"),
            "---\ntype: goodReadsBook\nbookID: 44767458\n---\n\n# Dune\n",
        );
        write(
            &dir.path().join("Emma.md"),
            "---\nbookID: \"6969\"\n---\nbody",
        );
        write(&dir.path().join("Plain.md"), "# No front matter\n");

        let index = scan(dir.path()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.notes_scanned(), 3);
        assert!(index.contains("44767458"));
        assert!(index.contains("6969"));
        assert_eq!(
            index.note_path("44767458"),
            Some(dir.path().join("Dune.md").as_path())
        );
    }

    #[test]
    fn test_scan_is_recursive_and_skips_hidden() {
        let dir = tempdir().unwrap();
        write(
            &dir.path().join("2023").join("Dune.md"),
            "---\nbookID: 1\n---\n",
        );
        write(
            &dir.path().join(".trash").join("Old.md"),
            "---\nbookID: 2\n---\n",
        );

        let index = scan(dir.path()).unwrap();
        assert!(index.contains("1"));
        assert!(!index.contains("2"));
    }

    #[test]
    fn test_scan_ignores_other_extensions() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("Dune.txt"), "---\nbookID: 1\n---\n");

        let index = scan(dir.path()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.notes_scanned(), 0);
    }

    #[test]
    fn test_scan_exact_id_match() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("A.md"), "---\nbookID: 1234\n---\n");

        let index = scan(dir.path()).unwrap();
        assert!(index.contains("1234"));
        assert!(!index.contains("123"));
        assert!(!index.contains("234"));
    }

    #[test]
    fn test_scan_skips_malformed_front_matter() {
        let dir = tempdir().unwrap();
        write(
            &dir.path().join("Broken.md"),
            "---\ntitle: \"Malformed\ntags: [unclosed\n---\nContent",
        );
        write(&dir.path().join("Good.md"), "---\nbookID: 7\n---\n");

        let index = scan(dir.path()).unwrap();
        assert_eq!(index.skipped(), 1);
        assert!(index.contains("7"));
    }

    #[test]
    fn test_scan_reads_book_id_from_invalid_yaml() {
        let dir = tempdir().unwrap();
        write(
            &dir.path().join("Dune.md"),
            "---\nbookID: 7\nnote: Dune: great\n---\n\n# Dune\n",
        );

        let index = scan(dir.path()).unwrap();
        assert!(index.contains("7"));
        assert_eq!(index.skipped(), 0);
    }

    #[test]
    fn test_duplicate_ids_keep_first_note() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("A.md"), "---\nbookID: 9\n---\n");
        write(&dir.path().join("B.md"), "---\nbookID: 9\n---\n");

        let index = scan(dir.path()).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.note_path("9"), Some(dir.path().join("A.md").as_path()));
    }
}
