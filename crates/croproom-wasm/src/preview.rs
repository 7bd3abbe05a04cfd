//! Live-preview WASM bindings.
//!
//! The browser composites the preview itself. These functions turn the edit
//! settings into the CSS strings and numbers the compositor needs, computed
//! by the same code the export uses.
//!
//! # Example
//!
//! ```typescript
//! img.style.transform = preview_transform_css(settings.transform);
//! img.style.filter = preview_filter_css(settings);
//! feFuncR.setAttribute('tableValues', curve_table_values(settings.curves.red));
//! ```

use crate::types::{from_js, from_js_or_default, to_js};
use croproom_core::geometry::{self, Size};
use croproom_core::settings::EditSettings;
use croproom_core::{curve, preview, CurvePoint, Transform};
use wasm_bindgen::prelude::*;

/// CSS `filter` value for the preview element.
///
/// `settings` is a full `EditSettings` object; missing fields take their
/// defaults. Returns `"none"` when nothing is active.
#[wasm_bindgen]
pub fn preview_filter_css(settings: JsValue) -> Result<String, JsValue> {
    let settings: EditSettings = from_js_or_default(settings, "edit settings")?;
    Ok(preview::preview_filter_chain(&settings.adjustments, &settings.filters).to_string())
}

/// CSS `transform` value for the preview element.
#[wasm_bindgen]
pub fn preview_transform_css(transform: JsValue) -> Result<String, JsValue> {
    let transform: Transform = from_js_or_default(transform, "transform")?;
    Ok(preview::preview_transform_css(&transform.normalized()))
}

/// `tableValues` attribute for an SVG `feFuncX` element.
///
/// # Arguments
/// * `points` - Array of `{x, y}` objects in 0-255, sorted by x
#[wasm_bindgen]
pub fn curve_table_values(points: JsValue) -> Result<String, JsValue> {
    let points: Vec<CurvePoint> = from_js(points, "curve points")?;
    Ok(preview::curve_table_values(&points))
}

/// 256-entry lookup table for a curve (byte values).
#[wasm_bindgen]
pub fn build_curve_lut(points: JsValue) -> Result<Vec<u8>, JsValue> {
    let points: Vec<CurvePoint> = from_js(points, "curve points")?;
    Ok(curve::build_lut_256(&points).to_vec())
}

/// The image's displayed footprint in container percent.
///
/// Returns `{x, y, width, height}`. This is both the crop bounds and the
/// `image_bounds` argument the export functions expect.
#[wasm_bindgen]
pub fn image_bounds(
    container_width: f64,
    container_height: f64,
    natural_width: f64,
    natural_height: f64,
    transform: JsValue,
) -> Result<JsValue, JsValue> {
    let transform: Transform = from_js_or_default(transform, "transform")?;
    let rect = geometry::image_bounds(
        Size::new(container_width, container_height),
        Size::new(natural_width, natural_height),
        &transform.normalized(),
    );
    to_js(&rect)
}

/// Overlay guide positions (percent) for `divisions` equal parts.
#[wasm_bindgen]
pub fn grid_lines(divisions: u32) -> Vec<f64> {
    preview::grid_lines(divisions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_lines_thirds() {
        let lines = grid_lines(3);
        assert_eq!(lines.len(), 2);
        assert!((lines[0] - 100.0 / 3.0).abs() < 1e-9);
        assert!((lines[1] - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_lines_none() {
        assert!(grid_lines(1).is_empty());
    }
}

/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use croproom_core::Rect;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_filter_css_default_is_none() {
        assert_eq!(preview_filter_css(JsValue::UNDEFINED).unwrap(), "none");
    }

    #[wasm_bindgen_test]
    fn test_filter_css_black_and_white() {
        let mut settings = EditSettings::default();
        settings.filters.black_and_white = 100.0;
        let css = preview_filter_css(serde_wasm_bindgen::to_value(&settings).unwrap()).unwrap();
        assert_eq!(css, "grayscale(1)");
    }

    #[wasm_bindgen_test]
    fn test_transform_css_default() {
        let css = preview_transform_css(JsValue::UNDEFINED).unwrap();
        assert_eq!(css, "rotate(0deg) scale(1) translate(0%, 0%)");
    }

    #[wasm_bindgen_test]
    fn test_identity_lut() {
        let points = vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(255.0, 255.0)];
        let lut = build_curve_lut(serde_wasm_bindgen::to_value(&points).unwrap()).unwrap();
        assert_eq!(lut.len(), 256);
        assert_eq!(lut[128], 128);
    }

    #[wasm_bindgen_test]
    fn test_invalid_points_rejected() {
        let invalid = serde_wasm_bindgen::to_value(&42).unwrap();
        assert!(curve_table_values(invalid).is_err());
    }

    #[wasm_bindgen_test]
    fn test_image_bounds_letterbox() {
        let value = image_bounds(800.0, 800.0, 1000.0, 500.0, JsValue::UNDEFINED).unwrap();
        let rect: Rect = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(rect, Rect::new(0.0, 25.0, 100.0, 50.0));
    }
}
