//! File name conventions for catalog entries.
//!
//! Comic archives are recognised by extension (`.cbz`, `.cbr`, matched
//! case-insensitively). Display titles are derived from the raw name:
//!
//! - `A_Comic.cbz` → "A Comic"
//! - `Vol_1.CBR` → "Vol 1"
//! - `_Specials_/` → "Specials" (folders keep their full name)

/// Archive extensions accepted by the scanner, lowercase.
pub const ARCHIVE_EXTENSIONS: &[&str] = &["cbz", "cbr"];

/// Entries whose name starts with this marker are never scanned.
pub const HIDDEN_MARKER: char = '.';

pub fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_MARKER)
}

/// Split an archive file name into its stem, if it carries a recognised extension.
///
/// The stem must be non-empty: `.cbz` alone is not an archive name.
pub fn archive_stem(filename: &str) -> Option<&str> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    ARCHIVE_EXTENSIONS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
        .then_some(stem)
}

/// Display title for a raw name: underscores become spaces, then trimmed.
pub fn display_title(raw: &str) -> String {
    raw.replace('_', " ").trim().to_string()
}

/// Case-insensitive sort key for sibling ordering.
pub fn sort_key(title: &str) -> String {
    title.to_lowercase()
}
