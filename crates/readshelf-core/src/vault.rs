//! Note persistence
//!
//! Notes are plain Markdown files in the notes directory. They are created
//! once and never rewritten: an existing file is always left alone.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while reading or writing notes
#[derive(Error, Debug)]
pub enum VaultError {
    /// Failed to create the notes directory
    #[error("Failed to create notes directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error(
        "Disk full or quota exceeded while writing to '{path}'. Free up disk space and try again."
    )]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A note with this file name already exists
    #[error("A note already exists at '{path}'")]
    AlreadyExists { path: PathBuf },

    /// Failed to read file or directory
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl VaultError {
    /// Create an error from a write-side I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, disk full, etc.)
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => VaultError::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::AlreadyExists => VaultError::AlreadyExists { path },
            _ if is_disk_full_error(&error) => VaultError::DiskFull {
                path,
                source: error,
            },
            _ => VaultError::WriteError {
                path,
                source: error,
            },
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            VaultError::DiskFull { .. } => Some("Free up disk space and run sync again."),
            VaultError::PermissionDenied { .. } => {
                Some("Check the permissions of the notes directory.")
            }
            VaultError::AlreadyExists { .. } => Some(
                "Another note already uses this title. Rename or move it and run sync again.",
            ),
            VaultError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

/// Create a new note, never overwriting an existing file
///
/// The directory is created if needed. Returns the path of the new note.
/// If writing fails after the file was created, the partial file is
/// removed so that the next sync retries the book.
pub fn create_note(dir: &Path, file_name: &str, content: &str) -> VaultResult<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| VaultError::CreateDirectory {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(file_name);
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| VaultError::from_io(e, path.clone()))?;

    if let Err(e) = file.write_all(content.as_bytes()).and_then(|_| file.sync_all()) {
        drop(file);
        let _ = fs::remove_file(&path);
        return Err(VaultError::from_io(e, path));
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_note() {
        let dir = tempdir().unwrap();
        let path = create_note(dir.path(), "Dune.md", "---\nbookID: 1\n---\n").unwrap();

        assert_eq!(path, dir.path().join("Dune.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "---\nbookID: 1\n---\n");
    }

    #[test]
    fn test_create_note_makes_directory() {
        let dir = tempdir().unwrap();
        let notes = dir.path().join("vault").join("Books");

        let path = create_note(&notes, "Dune.md", "body").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_create_note_never_overwrites() {
        let dir = tempdir().unwrap();
        let existing = dir.path().join("Dune.md");
        fs::write(&existing, "my own notes").unwrap();

        let err = create_note(dir.path(), "Dune.md", "generated").unwrap_err();

        assert!(matches!(err, VaultError::AlreadyExists { .. }));
        assert!(err.recovery_suggestion().is_some());
        assert_eq!(fs::read_to_string(&existing).unwrap(), "my own notes");
    }

    #[test]
    fn test_permission_denied_classification() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = VaultError::from_io(io_err, PathBuf::from("/test/path"));

        assert!(matches!(err, VaultError::PermissionDenied { .. }));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_disk_full_detection() {
        let io_err = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = VaultError::from_io(io_err, PathBuf::from("/full/disk"));

        assert!(matches!(err, VaultError::DiskFull { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = VaultError::AlreadyExists {
            path: PathBuf::from("/vault/Dune.md"),
        };

        let msg = err.to_string();
        assert!(msg.contains("already exists"));
        assert!(msg.contains("/vault/Dune.md"));
    }
}
