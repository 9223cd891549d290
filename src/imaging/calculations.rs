//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate thumbnail dimensions for a fixed target height.
///
/// The width keeps the source aspect ratio and is rounded down:
/// `width = floor(original_width * target_height / original_height)`.
/// Extremely tall sources still get a one-pixel-wide thumbnail rather than
/// an empty one.
///
/// # Examples
/// ```
/// # use comics_catalog::imaging::calculate_thumbnail_dimensions;
/// // 800x1200 page at 96px high → 64x96
/// assert_eq!(calculate_thumbnail_dimensions((800, 1200), 96), (64, 96));
///
/// // 1920x1080 spread at 96px high → 170x96 (170.67 rounded down)
/// assert_eq!(calculate_thumbnail_dimensions((1920, 1080), 96), (170, 96));
/// ```
pub fn calculate_thumbnail_dimensions(original: (u32, u32), target_height: u32) -> (u32, u32) {
    let (orig_w, orig_h) = original;
    if orig_h == 0 {
        return (1, target_height);
    }
    let width = (orig_w as u64 * target_height as u64 / orig_h as u64).max(1);
    (width.min(u32::MAX as u64) as u32, target_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portrait_page() {
        assert_eq!(calculate_thumbnail_dimensions((800, 1200), 96), (64, 96));
        assert_eq!(calculate_thumbnail_dimensions((600, 900), 96), (64, 96));
    }

    #[test]
    fn landscape_spread_rounds_down() {
        assert_eq!(calculate_thumbnail_dimensions((1920, 1080), 96), (170, 96));
    }

    #[test]
    fn square_source() {
        assert_eq!(calculate_thumbnail_dimensions((500, 500), 96), (96, 96));
    }

    #[test]
    fn upscales_small_sources() {
        assert_eq!(calculate_thumbnail_dimensions((40, 48), 96), (80, 96));
    }

    #[test]
    fn extreme_portrait_keeps_one_pixel() {
        assert_eq!(calculate_thumbnail_dimensions((10, 5000), 96), (1, 96));
    }

    #[test]
    fn aspect_ratio_preserved_within_rounding() {
        for (w, h) in [(800, 1200), (1654, 2339), (3000, 2000), (1000, 1414)] {
            let (tw, th) = calculate_thumbnail_dimensions((w, h), 96);
            assert_eq!(th, 96);
            let original = w as f64 / h as f64;
            let thumb = tw as f64 / th as f64;
            assert_eq!(original.round(), thumb.round(), "{w}x{h}");
            assert!((original - thumb).abs() < 1.0 / 96.0 + f64::EPSILON);
        }
    }
}
