//! Edit settings and export options.
//!
//! Everything the UI edits lives in one [`EditSettings`] value that is
//! handed to the pure geometry and render functions on every call. The core
//! keeps no state between calls.

use serde::{Deserialize, Serialize};

use crate::geometry::{CropArea, Point, Rotation, FULL_CROP};
use crate::{Adjustments, ColorCurves, FilterSettings};

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 1.0;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 3.0;
/// Pan offset limit per axis, in percent.
pub const MAX_PAN: f64 = 100.0;
/// Largest number of vertical slices.
pub const MAX_SPLIT_COUNT: u32 = 5;

/// Rotation, zoom and pan applied to the source image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub rotation: Rotation,
    pub zoom: f64,
    /// Pan offset in percent of the unrotated image size.
    pub position: Point,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: Rotation::Deg0,
            zoom: MIN_ZOOM,
            position: Point::default(),
        }
    }
}

impl Transform {
    /// Set zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`. NaN resets to 1.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = if zoom.is_nan() {
            MIN_ZOOM
        } else {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        };
    }

    /// Set rotation from degrees, wrapped into the four right angles.
    pub fn set_rotation_degrees(&mut self, degrees: i32) {
        self.rotation = Rotation::from_degrees(degrees);
    }

    pub fn rotate_clockwise(&mut self) {
        self.rotation = self.rotation.rotate_clockwise();
    }

    pub fn rotate_counter_clockwise(&mut self) {
        self.rotation = self.rotation.rotate_counter_clockwise();
    }

    /// Set the pan offset, clamped to ±100% per axis.
    pub fn set_position(&mut self, position: Point) {
        let clamp = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(-MAX_PAN, MAX_PAN) };
        self.position = Point::new(clamp(position.x), clamp(position.y));
    }

    /// Re-apply the write-time clamps, e.g. after deserializing.
    pub fn normalized(mut self) -> Self {
        self.set_zoom(self.zoom);
        self.set_position(self.position);
        self
    }
}

/// Number of equal-width vertical slices to cut the export into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitPlan {
    split_count: u32,
}

impl Default for SplitPlan {
    fn default() -> Self {
        Self::none()
    }
}

impl SplitPlan {
    /// Create a plan, clamping the count to `1..=MAX_SPLIT_COUNT`.
    pub fn new(split_count: u32) -> Self {
        Self {
            split_count: split_count.clamp(1, MAX_SPLIT_COUNT),
        }
    }

    /// Emit the whole image as a single buffer.
    pub fn none() -> Self {
        Self { split_count: 1 }
    }

    pub fn split_count(&self) -> u32 {
        self.split_count.clamp(1, MAX_SPLIT_COUNT)
    }

    pub fn is_split(&self) -> bool {
        self.split_count() > 1
    }
}

/// All editable parameters for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditSettings {
    pub transform: Transform,
    /// Crop in container percent.
    pub crop: CropArea,
    pub adjustments: Adjustments,
    pub filters: FilterSettings,
    pub curves: ColorCurves,
    pub split: SplitPlan,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            crop: FULL_CROP,
            adjustments: Adjustments::default(),
            filters: FilterSettings::default(),
            curves: ColorCurves::default(),
            split: SplitPlan::none(),
        }
    }
}

impl EditSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore every default. Called when a new image replaces the old one.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Knobs for the export pipeline and hand-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// JPEG quality 1–100. Ignored for PNG.
    pub jpeg_quality: u8,
    /// Output edge length at which resolution-dependent effects (blur,
    /// grain) look the same as in the preview.
    pub reference_size: f64,
    /// Pause between consecutive sink hand-offs, in milliseconds.
    pub slice_pacing_ms: u64,
    /// Filename without extension.
    pub filename_stem: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            jpeg_quality: 95,
            reference_size: 600.0,
            slice_pacing_ms: 300,
            filename_stem: "edited".to_string(),
        }
    }
}

impl ExportOptions {
    pub fn with_format(format: ExportFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_clamped() {
        let mut t = Transform::default();
        t.set_zoom(5.0);
        assert_eq!(t.zoom, MAX_ZOOM);
        t.set_zoom(0.2);
        assert_eq!(t.zoom, MIN_ZOOM);
        t.set_zoom(f64::NAN);
        assert_eq!(t.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_rotation_wraps_on_write() {
        let mut t = Transform::default();
        t.set_rotation_degrees(-90);
        assert_eq!(t.rotation, Rotation::Deg270);
        t.rotate_clockwise();
        assert_eq!(t.rotation, Rotation::Deg0);
        t.rotate_counter_clockwise();
        t.rotate_counter_clockwise();
        assert_eq!(t.rotation, Rotation::Deg180);
    }

    #[test]
    fn test_position_clamped() {
        let mut t = Transform::default();
        t.set_position(Point::new(150.0, -300.0));
        assert_eq!(t.position, Point::new(100.0, -100.0));
    }

    #[test]
    fn test_split_plan_clamped() {
        assert_eq!(SplitPlan::new(0).split_count(), 1);
        assert_eq!(SplitPlan::new(3).split_count(), 3);
        assert_eq!(SplitPlan::new(9).split_count(), 5);
        assert!(!SplitPlan::none().is_split());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut s = EditSettings::new();
        s.transform.set_zoom(2.0);
        s.filters.sepia = 40.0;
        s.crop.width = 30.0;
        s.reset();
        assert_eq!(s, EditSettings::new());
        assert_eq!(s.crop, FULL_CROP);
    }

    #[test]
    fn test_settings_deserialize_partial_json() {
        let json = r#"{ "transform": { "rotation": 90, "zoom": 1.5 }, "split": { "splitCount": 3 } }"#;
        let s: EditSettings = serde_json::from_str(json).unwrap();
        assert_eq!(s.transform.rotation, Rotation::Deg90);
        assert_eq!(s.transform.zoom, 1.5);
        assert_eq!(s.split.split_count(), 3);
        assert!(s.adjustments.is_default());
    }

    #[test]
    fn test_export_options_defaults() {
        let o: ExportOptions = serde_json::from_str(r#"{ "format": "jpeg" }"#).unwrap();
        assert_eq!(o.format, ExportFormat::Jpeg);
        assert_eq!(o.jpeg_quality, 95);
        assert_eq!(o.slice_pacing_ms, 300);
        assert_eq!(o.reference_size, 600.0);
    }
}
