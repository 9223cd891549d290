//! Cover extraction from comic archives.
//!
//! Archives are opened as ZIP containers regardless of extension. A `.cbr`
//! that really is a RAR file fails to open and is reported like any other
//! unreadable archive.
//!
//! The cover is the file entry whose name sorts first (plain byte order).
//! Directory entries are ignored. This matches reading order for the usual
//! zero-padded page names (`001.jpg`, `002.jpg`, ...).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: u64 = 64 << 20;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot read archive {0}: {1}")]
    Unreadable(PathBuf, ZipError),
    #[error("Archive has no entries: {0}")]
    Empty(PathBuf),
}

/// Raw bytes of the selected cover entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Pick the cover among entry names: the first in byte order, skipping directories.
pub fn select_cover<'a, I>(names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().filter(|n| !n.ends_with('/')).min()
}

/// Open `path`, select its cover entry, and read it fully.
pub fn read_cover(path: &Path) -> Result<CoverEntry, ArchiveError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| ArchiveError::Unreadable(path.to_path_buf(), e))?;

    let name = select_cover(archive.file_names())
        .map(str::to_owned)
        .ok_or_else(|| ArchiveError::Empty(path.to_path_buf()))?;

    let mut entry = archive
        .by_name(&name)
        .map_err(|e| ArchiveError::Unreadable(path.to_path_buf(), e))?;
    let mut bytes = Vec::with_capacity(capacity_hint(entry.size()));
    entry.read_to_end(&mut bytes)?;

    Ok(CoverEntry { name, bytes })
}

/// The declared size comes from the archive header and is not trusted.
fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOC)).unwrap_or(0)
}
