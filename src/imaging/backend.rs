//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the thumbnail cache
//! needs: identify (read dimensions from encoded bytes) and thumbnail
//! (decode, resize, encode, write).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::ThumbnailParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` so one backend can be shared by every rayon worker.
pub trait ImageBackend: Sync {
    /// Get image dimensions from encoded bytes.
    fn identify(&self, source: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode, resize and write a thumbnail.
    ///
    /// The output file must appear atomically: readers see either no file or
    /// the complete one.
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError>;
}
