//! Equal-width vertical slicing.

use crate::render::{RenderSurfaceError, Surface};

/// Widths of `count` vertical slices covering `total` columns.
///
/// Every slice is `floor(total / count)` wide except the last, which
/// absorbs the remainder, so the widths always sum to `total`. The count is
/// capped at `total` so no slice is empty.
pub fn split_widths(total: u32, count: u32) -> Vec<u32> {
    let count = count.clamp(1, total.max(1));
    let base = total / count;
    let mut widths = vec![base; count as usize];
    if let Some(last) = widths.last_mut() {
        *last = total - base * (count - 1);
    }
    widths
}

/// Cut `surface` into `count` vertical slices, left to right.
pub fn split_surface(surface: &Surface, count: u32) -> Result<Vec<Surface>, RenderSurfaceError> {
    let mut x = 0;
    split_widths(surface.width, count)
        .into_iter()
        .map(|width| {
            let slice = surface.crop_columns(x, width);
            x += width;
            slice
        })
        .collect()
}
