//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_thumbnail_dimensions;
use super::params::ThumbnailParams;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Plan a thumbnail operation without executing it.
pub fn plan_thumbnail<'a>(
    source: &'a [u8],
    original: Dimensions,
    output: &Path,
    target_height: u32,
) -> ThumbnailParams<'a> {
    let (width, height) =
        calculate_thumbnail_dimensions((original.width, original.height), target_height);
    ThumbnailParams {
        source,
        output: output.to_path_buf(),
        width,
        height,
    }
}

/// Create a fixed-height thumbnail from encoded cover bytes.
///
/// Returns the dimensions of the written thumbnail.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &[u8],
    output: &Path,
    target_height: u32,
) -> Result<Dimensions> {
    let original = backend.identify(source)?;
    let params = plan_thumbnail(source, original, output, target_height);
    backend.thumbnail(&params)?;
    Ok(Dimensions {
        width: params.width,
        height: params.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    #[test]
    fn plan_thumbnail_scales_to_target_height() {
        let params = plan_thumbnail(
            b"",
            Dimensions {
                width: 600,
                height: 900,
            },
            Path::new("/thumbs/x.png"),
            96,
        );
        assert_eq!((params.width, params.height), (64, 96));
        assert_eq!(params.output, Path::new("/thumbs/x.png"));
    }

    #[test]
    fn create_thumbnail_identifies_then_resizes() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("t.png");
        let backend = MockBackend::with_dimensions(Dimensions {
            width: 1920,
            height: 1080,
        });

        let dims = create_thumbnail(&backend, b"cover", &output, 96).unwrap();

        assert_eq!(dims, Dimensions { width: 170, height: 96 });
        let ops = backend.get_operations();
        assert_eq!(ops.len(), 2);
        assert!(matches!(&ops[0], RecordedOp::Identify(5)));
        assert!(matches!(
            &ops[1],
            RecordedOp::Thumbnail {
                width: 170,
                height: 96,
                ..
            }
        ));
    }

    #[test]
    fn create_thumbnail_propagates_backend_failure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = MockBackend::failing();
        let result = create_thumbnail(&backend, b"cover", &tmp.path().join("t.png"), 96);
        assert!(result.is_err());
    }
}
