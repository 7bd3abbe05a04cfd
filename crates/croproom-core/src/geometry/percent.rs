//! Percent-space and pixel-space conversions.

use super::{clamp_soft, CropArea, Rect, Size, FULL_CROP};

/// Convert a percentage of `total` to pixels.
#[inline]
pub fn percent_to_pixels(percent: f64, total: f64) -> f64 {
    percent * total / 100.0
}

/// Convert a pixel distance to a percentage of `total`.
///
/// A zero-size `total` maps everything to 0 rather than dividing by zero.
#[inline]
pub fn pixels_to_percent(pixels: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    pixels * 100.0 / total
}

/// Convert a percent rectangle to pixels within `container`.
pub fn rect_percent_to_pixels(rect: Rect, container: Size) -> Rect {
    Rect {
        x: percent_to_pixels(rect.x, container.width),
        y: percent_to_pixels(rect.y, container.height),
        width: percent_to_pixels(rect.width, container.width),
        height: percent_to_pixels(rect.height, container.height),
    }
}

/// Convert a pixel rectangle to percent of `container`.
pub fn rect_pixels_to_percent(rect: Rect, container: Size) -> Rect {
    Rect {
        x: pixels_to_percent(rect.x, container.width),
        y: pixels_to_percent(rect.y, container.height),
        width: pixels_to_percent(rect.width, container.width),
        height: pixels_to_percent(rect.height, container.height),
    }
}

/// Pixel boundaries of consecutive cells sized by `percentages` of `total`.
///
/// Returns `percentages.len() + 1` boundaries. The first is always 0; cell
/// `i` spans `[b[i], b[i + 1]]`. Interior boundaries double as resize-handle
/// positions. Percentages are expected to sum to roughly 100.
pub fn cumulative_positions(percentages: &[f64], total: f64) -> Vec<f64> {
    let mut boundaries = Vec::with_capacity(percentages.len() + 1);
    boundaries.push(0.0);

    let mut running = 0.0;
    for pct in percentages {
        running += pct;
        boundaries.push(percent_to_pixels(running, total));
    }

    boundaries
}

/// Interior guide-line positions (percent) dividing a span into
/// `divisions` equal parts. `3` yields the rule-of-thirds lines.
pub fn grid_lines(divisions: u32) -> Vec<f64> {
    if divisions < 2 {
        return Vec::new();
    }
    (1..divisions)
        .map(|i| f64::from(i) * 100.0 / f64::from(divisions))
        .collect()
}

/// Express a pixel aspect ratio (width / height) in the percent units of
/// `container`, which is what the crop drag controller works with.
///
/// A 1:1 lock inside a 200×100 container becomes 0.5: a square is 25% of
/// the width and 50% of the height.
pub fn percent_aspect(pixel_ratio: f64, container: Size) -> f64 {
    if container.is_degenerate() {
        return pixel_ratio;
    }
    pixel_ratio * container.height / container.width
}

/// Map a container-relative crop into image-relative percent.
///
/// `image_bounds` is the image's displayed footprint in container percent
/// (see [`super::image_bounds`]). The result is clamped into 0–100 so a
/// crop reaching past the image never addresses pixels outside it.
pub fn container_to_image_crop(crop: CropArea, image_bounds: Rect) -> CropArea {
    if !(image_bounds.width > 0.0 && image_bounds.height > 0.0) {
        return FULL_CROP;
    }

    let left = clamp_soft(
        (crop.x - image_bounds.x) / image_bounds.width * 100.0,
        0.0,
        100.0,
    );
    let top = clamp_soft(
        (crop.y - image_bounds.y) / image_bounds.height * 100.0,
        0.0,
        100.0,
    );
    let right = clamp_soft(
        (crop.right() - image_bounds.x) / image_bounds.width * 100.0,
        left,
        100.0,
    );
    let bottom = clamp_soft(
        (crop.bottom() - image_bounds.y) / image_bounds.height * 100.0,
        top,
        100.0,
    );

    Rect::new(left, top, right - left, bottom - top)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
