//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only, no full decode) |
//! | Decode (JPEG, PNG, GIF, TIFF, WebP, BMP) | `image::load_from_memory` |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → PNG | `image::codecs::png::PngEncoder`, best compression |
//! | Atomic write | `tempfile::NamedTempFile::persist` in the cache directory |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::ThumbnailParams;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(source: &[u8]) -> Result<DynamicImage, BackendError> {
    image::load_from_memory(source)
        .map_err(|e| BackendError::ProcessingFailed(format!("Failed to decode cover: {e}")))
}

/// Drop float/16-bit channels so the PNG encoder accepts the buffer.
fn to_8bit(img: DynamicImage) -> DynamicImage {
    if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    }
}

/// Encode as PNG into a temp file next to `path`, then rename over it.
fn save_png_atomic(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let encoder =
            PngEncoder::new_with_quality(&mut writer, CompressionType::Best, PngFilter::Adaptive);
        img.write_with_encoder(encoder)
            .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {e}")))?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| BackendError::Io(e.error))?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, source: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::new(Cursor::new(source))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!("Failed to read dimensions: {e}"))
            })?;
        if width == 0 || height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Degenerate image size {width}x{height}"
            )));
        }
        Ok(Dimensions { width, height })
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        let img = decode(params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_png_atomic(&to_8bit(resized), &params.output)
    }
}
