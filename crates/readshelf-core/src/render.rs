//! Note rendering
//!
//! Turns a shelf item into the file name and Markdown content of its note,
//! either from a user template with `{{placeholder}}` fields or from the
//! built-in front matter.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::{debug, warn};

use crate::frontmatter::{self, yaml_scalar, BOOK_ID_KEY};
use crate::models::ShelfItem;

/// Longest file stem we write, in bytes
const MAX_STEM_LEN: usize = 180;

/// Characters that are not allowed in file names on common platforms
const ILLEGAL_FILENAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// Errors that can occur while loading or applying a template
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template file could not be read
    #[error("Failed to read template '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template hard-codes a different book ID
    #[error("Template sets bookID to '{found}' but the book is {book_id}")]
    BookIdMismatch { book_id: String, found: String },
}

/// A note template
#[derive(Debug, Clone, Default)]
pub enum Template {
    /// Static front matter plus a heading and the book description
    #[default]
    Builtin,
    /// User template read from a file
    Custom { path: PathBuf, source: String },
}

impl Template {
    /// Read a template file
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_source(path, source))
    }

    /// Use template text that has already been read
    pub fn from_source(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Template::Custom {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Load the configured template, or the built-in one when none is set
    pub fn from_config(path: Option<&Path>) -> Result<Self, TemplateError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Template::Builtin),
        }
    }

    /// Render the note for an item
    ///
    /// The result always carries the item's `bookID` in its front matter, so
    /// later syncs recognise the note.
    pub fn render(&self, item: &ShelfItem) -> Result<String, TemplateError> {
        match self {
            Template::Builtin => Ok(render_builtin(item)),
            Template::Custom { path, source } => {
                let rendered = substitute(source, item, path);
                ensure_book_id(&rendered, &item.book_id)
            }
        }
    }
}

fn render_builtin(item: &ShelfItem) -> String {
    let mut note = String::from("---\n");
    let mut field = |key: &str, value: String| {
        note.push_str(key);
        note.push_str(": ");
        note.push_str(&value);
        note.push('\n');
    };

    field("type", "goodReadsBook".to_string());
    field(BOOK_ID_KEY, book_id_scalar(&item.book_id));
    field("title", yaml_scalar(&item.title));
    field("author", yaml_scalar(&format!("[[{}]]", item.author_name)));
    field("isbn", yaml_scalar(&item.isbn));
    field("rating", item.user_rating.to_string());
    field("shelves", yaml_scalar(&item.user_shelves));
    field("dateAdded", yaml_scalar(&item.user_date_added));
    field("dateRead", yaml_scalar(&item.user_read_at));

    note.push_str("---\n\n# ");
    note.push_str(&item.title);
    note.push('\n');

    let description = item.book_description.trim();
    if !description.is_empty() {
        note.push('\n');
        note.push_str(description);
        note.push('\n');
    }

    note
}

/// Numeric IDs are written bare, anything else is quoted as needed
fn book_id_scalar(book_id: &str) -> String {
    if !book_id.is_empty() && book_id.chars().all(|c| c.is_ascii_digit()) {
        book_id.to_string()
    } else {
        yaml_scalar(book_id)
    }
}

fn substitute(source: &str, item: &ShelfItem, path: &Path) -> String {
    let mut unknown: Vec<String> = Vec::new();

    let rendered = PLACEHOLDER.replace_all(source, |caps: &Captures| {
        let name = &caps[1];
        match lookup(item, name) {
            Some(value) => value,
            None => {
                if !unknown.iter().any(|u| u == name) {
                    unknown.push(name.to_string());
                }
                caps[0].to_string()
            }
        }
    });

    if !unknown.is_empty() {
        warn!(
            "Template {:?} uses unknown placeholder(s): {}",
            path,
            unknown.join(", ")
        );
    }

    rendered.into_owned()
}

fn lookup(item: &ShelfItem, name: &str) -> Option<String> {
    match name {
        "today" => Some(chrono::Local::now().format("%Y-%m-%d").to_string()),
        _ => item.field(name),
    }
}

/// Make sure a rendered note records the book ID in its front matter
fn ensure_book_id(rendered: &str, book_id: &str) -> Result<String, TemplateError> {
    let line = format!("{}: {}\n", BOOK_ID_KEY, book_id_scalar(book_id));

    let Some((yaml, _)) = frontmatter::split(rendered) else {
        return Ok(format!("---\n{}---\n\n{}", line, rendered));
    };

    // Template output is written as-is even when it is not valid YAML;
    // only the bookID line has to be readable by the next scan
    let found = match frontmatter::book_id(yaml) {
        Ok(found) => found,
        Err(e) => {
            debug!("Front matter for book {} is not valid YAML: {}", book_id, e);
            None
        }
    };

    match found {
        Some(found) if found == book_id => Ok(rendered.to_string()),
        Some(found) => Err(TemplateError::BookIdMismatch {
            book_id: book_id.to_string(),
            found,
        }),
        None => {
            // Insert right after the opening `---` line
            let split_at = rendered.find('\n').map_or(rendered.len(), |i| i + 1);
            let (head, tail) = rendered.split_at(split_at);
            Ok(format!("{}{}{}", head, line, tail))
        }
    }
}

/// Make a title safe to use as a file name
///
/// Illegal characters and control characters become spaces, runs of
/// whitespace collapse to one space, and trailing dots are removed. Falls
/// back to `fallback` when nothing usable is left.
pub fn sanitize_title(title: &str, fallback: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| {
            if ILLEGAL_FILENAME_CHARS.contains(&c) || c.is_control() {
                ' '
            } else {
                c
            }
        })
        .collect();

    let mut name = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    while name.ends_with('.') || name.ends_with(' ') {
        name.pop();
    }

    if name.len() > MAX_STEM_LEN {
        let mut cut = MAX_STEM_LEN;
        while !name.is_char_boundary(cut) {
            cut -= 1;
        }
        name.truncate(cut);
        name.truncate(name.trim_end_matches(['.', ' ']).len());
    }

    if name.is_empty() {
        fallback.to_string()
    } else {
        name
    }
}

/// File name of an item's note
pub fn note_file_name(item: &ShelfItem) -> String {
    format!("{}.md", sanitize_title(&item.title, &item.book_id))
}

/// Alternative file name used when the plain title is taken by another note
pub fn disambiguated_file_name(item: &ShelfItem) -> String {
    format!(
        "{} ({}).md",
        sanitize_title(&item.title, &item.book_id),
        item.book_id
    )
}
