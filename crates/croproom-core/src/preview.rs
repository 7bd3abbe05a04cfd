//! Descriptors for the live preview.
//!
//! The host renders the preview with its own compositor. These helpers
//! describe the edit in the compositor's vocabulary so the preview and the
//! export draw from the same numbers.

use crate::settings::Transform;

pub use crate::curve::curve_table_values;
pub use crate::filter::preview_filter_chain;
pub use crate::geometry::{grid_lines, image_bounds};

/// CSS transform for the preview image element.
///
/// Same order as the export draw: rotate, then zoom, then pan in percent of
/// the element's own (unrotated) size.
///
/// # Example
///
/// ```ignore
/// let css = preview_transform_css(&settings.transform);
/// // "rotate(90deg) scale(1.5) translate(10%, -5%)"
/// ```
pub fn preview_transform_css(transform: &Transform) -> String {
    format!(
        "rotate({}deg) scale({}) translate({}%, {}%)",
        transform.rotation.degrees(),
        transform.zoom,
        transform.position.x,
        transform.position.y
    )
}
