//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! [`operations`](super::operations), which decides the output geometry, and
//! the [`backend`](super::backend), which does the pixel work. Swapping the
//! backend (e.g. for a mock in tests) leaves operation logic untouched.

use std::path::PathBuf;

/// Default thumbnail height in pixels.
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 96;

/// Extension of every cached thumbnail.
pub const THUMBNAIL_EXTENSION: &str = "png";

/// Parameters for one thumbnail: decode `source`, resize to exactly
/// `width`x`height`, write a PNG to `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams<'a> {
    /// Encoded cover bytes as read from the archive
    pub source: &'a [u8],
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}
