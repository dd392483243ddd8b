//! YAML front matter helpers
//!
//! A note has front matter when its first line is `---`; the block runs
//! until the next `---` line.

use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;

/// Front matter key holding the Goodreads book ID
pub const BOOK_ID_KEY: &str = "bookID";

/// A plain `bookID: <id>` line, optionally quoted or followed by a comment
static BOOK_ID_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^bookID:[ \t]*(?:"([^"\s]+)"|'([^'\s]+)'|([^\s"'\[\]{},#]+))[ \t]*(?:#.*)?\r?$"#,
    )
    .expect("bookID line pattern is valid")
});

/// Split a note into its front matter and body
///
/// Returns `None` when the note has no (terminated) front matter block.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

/// Read the `bookID` field from a front matter block
///
/// Numbers and strings are both accepted and returned in trimmed string
/// form. Empty values count as absent. When the block is not valid YAML
/// (hand-edited notes, unquoted template output) a top-level `bookID:`
/// line still counts; the error is returned only when there is none.
pub fn book_id(yaml: &str) -> Result<Option<String>, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = match serde_yaml::from_str(yaml) {
        Ok(value) => value,
        Err(e) => return book_id_line(yaml).map(Some).ok_or(e),
    };
    let id = match value.get(BOOK_ID_KEY) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Ok(None),
    };

    Ok(if id.is_empty() { None } else { Some(id) })
}

/// Find a `bookID` line without parsing the block as YAML
pub fn book_id_line(yaml: &str) -> Option<String> {
    let caps = BOOK_ID_LINE.captures(yaml)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().to_string())
}

/// Render a string as a single-line YAML scalar, quoting when needed
pub fn yaml_scalar(value: &str) -> String {
    match serde_yaml::to_string(value) {
        Ok(s) if !s.trim_end().contains('\n') => s.trim_end().to_string(),
        // Multi-line values become a double-quoted flow scalar
        _ => format!("{:?}", value),
    }
}
