//! Content-addressed thumbnail cache and the annotation pass.
//!
//! Stage 2 of the pipeline. For every album without a cover, the archive is
//! opened, its cover entry is read and hashed, and a thumbnail is produced at
//! `<cache_dir>/<sha256>.png` unless that file already exists.
//!
//! # Design
//!
//! ## Cache keys
//!
//! The cache key is the SHA-256 of the cover entry's raw bytes, so the cache
//! needs no manifest: the file name *is* the key. Two albums whose covers are
//! byte-identical share one thumbnail, across albums and across runs, and
//! renaming or moving an archive never invalidates anything.
//!
//! ## Concurrency
//!
//! Albums are processed on the rayon pool. The check-exists-then-write step
//! is serialized per hash through [`HashLocks`], and the backend writes via a
//! temp file + rename, so a hash is encoded at most once per run and nobody
//! ever reads a half-written thumbnail.
//!
//! ## Failures
//!
//! Everything that can go wrong for one album (unreadable archive, no entries,
//! undecodable cover) is recorded in the returned [`Annotation`] and logged;
//! the album simply stays without a [`Cover`].
//!
//! ## Tree handling
//!
//! The scanned tree is not mutated. Outcomes are collected into a side table
//! keyed by album path and an annotated copy of the tree is built from it.
//! Albums that already carry a cover are left exactly as they are.

use crate::archive::{self, ArchiveError};
use crate::imaging::{self, BackendError, ImageBackend, THUMBNAIL_EXTENSION};
use crate::types::{self, Album, Cover, Folder, Node};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error("Cover image failed: {0}")]
    Image(#[from] BackendError),
}

/// How one album's cover was resolved.
#[derive(Debug)]
pub enum Outcome {
    /// Thumbnail already existed on disk
    Cached(Cover),
    /// Thumbnail was rendered during this run
    Encoded(Cover),
    Failed(ThumbnailError),
}

/// Result of annotating a tree.
#[derive(Debug)]
pub struct Annotation {
    pub tree: Vec<Node>,
    pub stats: CacheStats,
    /// `(album relative path, error)` for every album left without a cover
    pub failures: Vec<(String, ThumbnailError)>,
}

/// Per-hash mutexes guarding the check-exists-then-write step.
#[derive(Default)]
struct HashLocks(Mutex<HashMap<String, Arc<Mutex<()>>>>);

impl HashLocks {
    fn get(&self, hash: &str) -> Arc<Mutex<()>> {
        let mut map = self.0.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(hash.to_string()).or_default().clone()
    }
}

/// Thumbnail cache rooted at one directory.
pub struct ThumbnailCache<'a, B: ImageBackend> {
    backend: &'a B,
    cache_dir: PathBuf,
    target_height: u32,
    locks: HashLocks,
}

impl<'a, B: ImageBackend> ThumbnailCache<'a, B> {
    pub fn new(backend: &'a B, cache_dir: &Path, target_height: u32) -> Self {
        Self {
            backend,
            cache_dir: cache_dir.to_path_buf(),
            target_height,
            locks: HashLocks::default(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Site-relative path stored in [`Cover::thumbnail_path`].
    pub fn thumbnail_path(&self, hash: &str) -> String {
        let dir = self.cache_dir.to_string_lossy().replace('\\', "/");
        format!(
            "{}/{}",
            dir.trim_end_matches('/'),
            thumbnail_file_name(hash)
        )
    }

    /// Resolve the cover of the archive at `archive_path`.
    pub fn resolve(&self, archive_path: &Path) -> Outcome {
        match self.try_resolve(archive_path) {
            Ok(outcome) => outcome,
            Err(e) => Outcome::Failed(e),
        }
    }

    fn try_resolve(&self, archive_path: &Path) -> Result<Outcome, ThumbnailError> {
        let entry = archive::read_cover(archive_path)?;
        let hash = hash_bytes(&entry.bytes);
        let output = self.cache_dir.join(thumbnail_file_name(&hash));
        let cover = Cover {
            thumbnail_path: self.thumbnail_path(&hash),
            hash: hash.clone(),
        };

        let lock = self.locks.get(&hash);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        if output.exists() {
            tracing::debug!(archive = %archive_path.display(), %hash, "thumbnail cached");
            return Ok(Outcome::Cached(cover));
        }

        let dims = imaging::create_thumbnail(self.backend, &entry.bytes, &output, self.target_height)?;
        tracing::debug!(
            archive = %archive_path.display(),
            cover = %entry.name,
            %hash,
            width = dims.width,
            height = dims.height,
            "thumbnail encoded"
        );
        Ok(Outcome::Encoded(cover))
    }

    /// Attach covers to every album of `tree` that lacks one.
    ///
    /// `albums_root` is the directory the album paths are relative to.
    /// Only failing to create the cache directory is an error; per-album
    /// problems end up in [`Annotation::failures`].
    pub fn annotate(&self, albums_root: &Path, tree: &[Node]) -> io::Result<Annotation> {
        std::fs::create_dir_all(&self.cache_dir)?;

        let pending: Vec<&Album> = types::albums(tree)
            .into_iter()
            .filter(|a| a.cover.is_none())
            .collect();

        let outcomes: Vec<(String, Outcome)> = pending
            .par_iter()
            .map(|album| {
                let path = albums_root.join(&album.relative_path);
                (album.relative_path.clone(), self.resolve(&path))
            })
            .collect();

        let mut stats = CacheStats::default();
        let mut failures = Vec::new();
        let mut covers: HashMap<String, Cover> = HashMap::new();
        for (path, outcome) in outcomes {
            match outcome {
                Outcome::Cached(cover) => {
                    stats.hit();
                    covers.insert(path, cover);
                }
                Outcome::Encoded(cover) => {
                    stats.miss();
                    covers.insert(path, cover);
                }
                Outcome::Failed(e) => {
                    tracing::warn!(album = %path, error = %e, "no thumbnail for album");
                    stats.fail();
                    failures.push((path, e));
                }
            }
        }

        Ok(Annotation {
            tree: attach_covers(tree, &covers),
            stats,
            failures,
        })
    }
}

/// Copy `nodes`, filling in covers from the side table.
fn attach_covers(nodes: &[Node], covers: &HashMap<String, Cover>) -> Vec<Node> {
    nodes
        .iter()
        .map(|node| match node {
            Node::Folder(f) => Node::Folder(Folder {
                children: attach_covers(&f.children, covers),
                ..f.clone()
            }),
            Node::Album(a) => Node::Album(Album {
                cover: a
                    .cover
                    .clone()
                    .or_else(|| covers.get(&a.relative_path).cloned()),
                ..a.clone()
            }),
        })
        .collect()
}

/// `<hash>.png`
pub fn thumbnail_file_name(hash: &str) -> String {
    format!("{hash}.{THUMBNAIL_EXTENSION}")
}

/// SHA-256 of a byte slice, returned as a hex string.
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Summary of cache performance for a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
    pub failed: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn fail(&mut self) {
        self.failed += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses + self.failed
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed = if self.failed > 0 {
            format!(", {} failed", self.failed)
        } else {
            String::new()
        };
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} encoded{} ({} total)",
                self.hits,
                self.misses,
                failed,
                self.total()
            )
        } else {
            write!(f, "{} encoded{}", self.misses, failed)
        }
    }
}
