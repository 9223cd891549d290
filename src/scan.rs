//! Filesystem scanning into the catalog tree.
//!
//! Stage 1 of the pipeline. Walks the albums directory and produces an ordered
//! tree of [`Node`]s:
//!
//! ```text
//! albums/                        # Catalog root
//! ├── A_Comic.cbz                # Album "A Comic"
//! ├── .hidden.cbz                # Skipped (hidden)
//! ├── notes.txt                  # Skipped (not an archive)
//! ├── Empty/                     # Pruned (nothing inside)
//! └── Series/                    # Folder "Series"
//!     ├── Vol_1.cbz              # Album "Vol 1"
//!     └── Vol_2.CBZ              # Album "Vol 2" (extension case ignored)
//! ```
//!
//! ## Rules
//!
//! - Hidden entries (leading `.`) are ignored entirely.
//! - Directories become folders only if their subtree yields at least one album.
//! - Siblings are sorted by lowercase title. Entries are pre-sorted by raw name
//!   so titles differing only in case keep a stable order between runs.
//! - A missing scan root is fatal; nothing else is.

use crate::naming;
use crate::types::{Album, Folder, Node};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Albums directory doesn't exist: {0}")]
    RootNotFound(PathBuf),
}

/// Scan the whole catalog below `root`.
pub fn scan(root: &Path) -> Result<Vec<Node>, ScanError> {
    scan_dir(root, "")
}

/// Scan `root/relative`, returning its sorted, pruned children.
pub fn scan_dir(root: &Path, relative: &str) -> Result<Vec<Node>, ScanError> {
    let dir = if relative.is_empty() {
        root.to_path_buf()
    } else {
        root.join(relative)
    };
    if !dir.is_dir() {
        return Err(ScanError::RootNotFound(dir));
    }
    Ok(scan_level(&collect_entries(&dir)?, relative))
}

fn scan_level(entries: &[(String, PathBuf)], relative: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (name, path) in entries {
        let child_relative = if relative.is_empty() {
            name.clone()
        } else {
            format!("{relative}/{name}")
        };

        if path.is_dir() {
            let children = match collect_entries(path) {
                Ok(entries) => scan_level(&entries, &child_relative),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable directory");
                    continue;
                }
            };
            if !children.is_empty() {
                nodes.push(Node::Folder(Folder {
                    title: naming::display_title(name),
                    filename: name.clone(),
                    relative_path: child_relative,
                    children,
                }));
            }
        } else if let Some(stem) = naming::archive_stem(name) {
            let size_bytes = match fs::metadata(path) {
                Ok(meta) => meta.len(),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable archive");
                    continue;
                }
            };
            nodes.push(Node::Album(Album {
                title: naming::display_title(stem),
                filename: name.clone(),
                relative_path: child_relative,
                size_bytes,
                cover: None,
            }));
        }
    }

    nodes.sort_by_cached_key(|n| naming::sort_key(n.title()));
    nodes
}

/// Non-hidden directory entries as `(name, path)`, sorted by raw name.
///
/// Names that are not valid UTF-8 cannot be carried through relative paths
/// and links, so they are skipped.
fn collect_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>, ScanError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        match entry.file_name().into_string() {
            Ok(name) if naming::is_hidden(&name) => {}
            Ok(name) => entries.push((name, path)),
            Err(_) => {
                tracing::warn!(path = %path.display(), "skipping entry with a non UTF-8 name");
            }
        }
    }

    entries.sort();
    Ok(entries)
}
