//! Image processing in pure Rust, with no system dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Thumbnail** | Lanczos3 `resize_exact` + PNG encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::calculate_thumbnail_dimensions;
pub use operations::create_thumbnail;
pub use params::{DEFAULT_THUMBNAIL_HEIGHT, THUMBNAIL_EXTENSION, ThumbnailParams};
pub use rust_backend::RustBackend;
