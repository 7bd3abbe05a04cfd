//! Crop interaction WASM bindings.
//!
//! The host owns pointer listeners and forwards events here; the controller
//! returns the crop to show for each move.
//!
//! # Example
//!
//! ```typescript
//! const bounds = image_bounds(cw, ch, image.width, image.height, settings.transform);
//! const drag = new JsCropController(bounds);
//! drag.set_aspect(aspect_preset_ratio('square', image.width, image.height, 0, cw, ch));
//!
//! el.onpointerdown = (e) => drag.pointer_down('se', toPercent(e), settings.crop);
//! el.onpointermove = (e) => {
//!   const next = drag.pointer_move(toPercent(e));
//!   if (next) settings.crop = next;
//! };
//! el.onpointerup = () => drag.pointer_up();
//! ```

use crate::types::{from_js, to_js};
use croproom_core::crop::{with_aspect_lock as core_aspect_lock, AspectPreset, CropDragController};
use croproom_core::geometry::{percent_aspect, Size};
use croproom_core::{Bounds, CropArea, DragHandle, Point, Rect, Rotation};
use wasm_bindgen::prelude::*;

/// Crop drag state machine for one preview container.
#[wasm_bindgen]
pub struct JsCropController {
    inner: CropDragController,
}

#[wasm_bindgen]
impl JsCropController {
    /// Create an idle controller.
    ///
    /// # Arguments
    /// * `image_bounds` - `{x, y, width, height}` in container percent, as
    ///   returned by `image_bounds`
    #[wasm_bindgen(constructor)]
    pub fn new(image_bounds: JsValue) -> Result<JsCropController, JsValue> {
        let rect: Rect = from_js(image_bounds, "image bounds")?;
        Ok(Self::with_bounds(Bounds::from_rect_clamped(rect)))
    }

    /// Replace the bounds, e.g. after a rotation or container resize.
    pub fn set_bounds(&mut self, image_bounds: JsValue) -> Result<(), JsValue> {
        let rect: Rect = from_js(image_bounds, "image bounds")?;
        self.inner.set_bounds(Bounds::from_rect_clamped(rect));
        Ok(())
    }

    /// Lock resizes to `ratio` (width / height in percent units), or
    /// unlock with `undefined`.
    pub fn set_aspect(&mut self, ratio: Option<f64>) {
        self.inner.set_aspect(ratio);
    }

    /// Current ratio lock, if any.
    #[wasm_bindgen(getter)]
    pub fn aspect(&self) -> Option<f64> {
        self.inner.aspect()
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    /// Begin a drag.
    ///
    /// # Arguments
    /// * `handle` - `"move"`, an edge (`"n"`, `"s"`, `"e"`, `"w"`) or a
    ///   corner (`"ne"`, `"nw"`, `"se"`, `"sw"`)
    /// * `pointer` - `{x, y}` in container percent
    /// * `crop` - the crop at drag start
    pub fn pointer_down(&mut self, handle: JsValue, pointer: JsValue, crop: JsValue) -> Result<(), JsValue> {
        let handle: DragHandle = from_js(handle, "drag handle")?;
        let pointer: Point = from_js(pointer, "pointer")?;
        let crop: CropArea = from_js(crop, "crop")?;
        self.inner.pointer_down(handle, pointer, crop);
        Ok(())
    }

    /// Crop for the current pointer, or `undefined` when no drag is active.
    pub fn pointer_move(&self, pointer: JsValue) -> Result<JsValue, JsValue> {
        let pointer: Point = from_js(pointer, "pointer")?;
        match self.inner.pointer_move(pointer) {
            Some(crop) => to_js(&crop),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn pointer_up(&mut self) {
        self.inner.pointer_up();
    }

    pub fn pointer_cancel(&mut self) {
        self.inner.pointer_cancel();
    }

    /// Handle under `pointer`, or `undefined`. Corners win over edges,
    /// edges over the interior.
    pub fn hit_test(&self, pointer: JsValue, crop: JsValue, tolerance: f64) -> Result<JsValue, JsValue> {
        let pointer: Point = from_js(pointer, "pointer")?;
        let crop: CropArea = from_js(crop, "crop")?;
        match DragHandle::hit_test(pointer, &crop, tolerance) {
            Some(handle) => to_js(&handle),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}

impl JsCropController {
    fn with_bounds(bounds: Bounds) -> Self {
        Self {
            inner: CropDragController::new(bounds),
        }
    }
}

/// Re-fit `crop` to a newly chosen ratio inside `image_bounds`.
///
/// `ratio` is in percent units (see `aspect_preset_ratio`); `undefined`
/// only clamps the crop.
#[wasm_bindgen]
pub fn with_aspect_lock(crop: JsValue, ratio: Option<f64>, image_bounds: JsValue) -> Result<JsValue, JsValue> {
    let crop: CropArea = from_js(crop, "crop")?;
    let rect: Rect = from_js(image_bounds, "image bounds")?;
    to_js(&core_aspect_lock(crop, ratio, Bounds::from_rect_clamped(rect)))
}

/// Ratio lock for a named preset, in the container's percent units.
///
/// # Arguments
/// * `preset` - `"free"`, `"original"`, `"square"`, `"r4_3"`, ...
/// * `natural_width`, `natural_height` - source size before rotation
/// * `rotation_degrees` - 0, 90, 180 or 270
/// * `container_width`, `container_height` - preview box in CSS pixels
///
/// Returns `undefined` for a free crop.
#[wasm_bindgen]
pub fn aspect_preset_ratio(
    preset: JsValue,
    natural_width: f64,
    natural_height: f64,
    rotation_degrees: i32,
    container_width: f64,
    container_height: f64,
) -> Result<Option<f64>, JsValue> {
    let preset: AspectPreset = from_js(preset, "aspect preset")?;
    Ok(preset_ratio(
        preset,
        Size::new(natural_width, natural_height),
        Rotation::from_degrees(rotation_degrees),
        Size::new(container_width, container_height),
    ))
}

fn preset_ratio(preset: AspectPreset, natural: Size, rotation: Rotation, container: Size) -> Option<f64> {
    preset
        .pixel_ratio(rotation.rotated_size(natural))
        .map(|ratio| percent_aspect(ratio, container))
}

/// Display label for a preset, e.g. `"16:9"`.
#[wasm_bindgen]
pub fn aspect_preset_label(preset: JsValue) -> Result<String, JsValue> {
    from_js::<AspectPreset>(preset, "aspect preset").map(|p| p.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_starts_idle() {
        let drag = JsCropController::with_bounds(Bounds::FULL);
        assert!(!drag.is_dragging());
        assert_eq!(drag.aspect(), None);
    }

    #[test]
    fn test_set_aspect_ignores_invalid() {
        let mut drag = JsCropController::with_bounds(Bounds::FULL);
        drag.set_aspect(Some(1.5));
        assert_eq!(drag.aspect(), Some(1.5));
        drag.set_aspect(Some(-1.0));
        assert_eq!(drag.aspect(), None);
    }

    #[test]
    fn test_square_preset_in_wide_container() {
        let ratio = preset_ratio(
            AspectPreset::Square,
            Size::new(400.0, 300.0),
            Rotation::Deg0,
            Size::new(200.0, 100.0),
        );
        assert_eq!(ratio, Some(0.5));
    }

    #[test]
    fn test_original_preset_follows_rotation() {
        let ratio = preset_ratio(
            AspectPreset::Original,
            Size::new(400.0, 200.0),
            Rotation::Deg90,
            Size::new(100.0, 100.0),
        );
        assert_eq!(ratio, Some(0.5));
    }

    #[test]
    fn test_free_preset_has_no_ratio() {
        let ratio = preset_ratio(
            AspectPreset::Free,
            Size::new(400.0, 200.0),
            Rotation::Deg0,
            Size::new(100.0, 100.0),
        );
        assert_eq!(ratio, None);
    }
}

/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use croproom_core::geometry::FULL_CROP;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn js<T: serde::Serialize>(value: &T) -> JsValue {
        serde_wasm_bindgen::to_value(value).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_drag_cycle() {
        let mut drag = JsCropController::new(js(&Rect::new(0.0, 0.0, 100.0, 100.0))).unwrap();
        drag.pointer_down(js(&DragHandle::SE), js(&Point::new(100.0, 100.0)), js(&FULL_CROP))
            .unwrap();
        assert!(drag.is_dragging());

        let next: CropArea =
            serde_wasm_bindgen::from_value(drag.pointer_move(js(&Point::new(80.0, 90.0))).unwrap()).unwrap();
        assert_eq!(next, Rect::new(0.0, 0.0, 80.0, 90.0));

        drag.pointer_up();
        assert!(drag.pointer_move(js(&Point::new(50.0, 50.0))).unwrap().is_undefined());
    }

    #[wasm_bindgen_test]
    fn test_unknown_handle_rejected() {
        let mut drag = JsCropController::new(js(&Rect::new(0.0, 0.0, 100.0, 100.0))).unwrap();
        let result = drag.pointer_down(JsValue::from_str("middle"), js(&Point::new(1.0, 1.0)), js(&FULL_CROP));
        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    fn test_preset_label() {
        assert_eq!(aspect_preset_label(js(&AspectPreset::R16_9)).unwrap(), "16:9");
    }
}
