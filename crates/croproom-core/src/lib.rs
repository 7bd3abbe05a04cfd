//! Croproom Core - Image transform, color-grading and export library
//!
//! This crate provides the non-destructive editing core for Croproom:
//! crop geometry, tone curves, filter composition, pixel effects and the
//! export pipeline that reproduces the preview at full resolution.

pub mod crop;
pub mod curve;
pub mod decode;
pub mod effects;
pub mod export;
pub mod filter;
pub mod geometry;
pub mod preview;
pub mod render;
pub mod settings;

pub use crop::{crop_drag_update, with_aspect_lock, AspectPreset, CropDragController, DragHandle};
pub use curve::{build_lut, build_lut_256, is_modified, ChannelLuts};
pub use decode::{decode_image, DecodeError, RasterImage};
pub use export::{deliver_all, export_to_sink, EncodedBuffer, ExportError, ExportSink, SinkError};
pub use filter::{build_filter_chain, preview_filter_chain, FilterChain, FilterPrimitive};
pub use geometry::{Bounds, CropArea, Point, Rect, Rotation, Size};
pub use render::{render_export, RenderSurfaceError, Surface};
pub use settings::{EditSettings, ExportFormat, ExportOptions, SplitPlan, Transform};

use serde::{Deserialize, Serialize};

/// Scalar slider adjustments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    /// Exposure (-100 to 100)
    pub exposure: f32,
    /// Saturation (-100 to 100)
    pub saturation: f32,
    /// Brilliance (-100 to 100)
    pub brilliance: f32,
    /// Shadows (-100 to 100)
    pub shadows: f32,
    /// Sharpness (0 to 100)
    pub sharpness: f32,
}

impl Adjustments {
    /// Create a new Adjustments with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Named filter intensities, each 0 to 100. Zero means inactive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSettings {
    pub vintage: f32,
    pub black_and_white: f32,
    pub sepia: f32,
    pub warm: f32,
    pub cool: f32,
    pub fade: f32,
    pub vignette: f32,
    pub grain: f32,
    pub blur: f32,
    pub invert: f32,
    pub posterize: f32,
}

impl FilterSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Tone curve control point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Input value (0 to 255)
    pub x: f32,
    /// Output value (0 to 255)
    pub y: f32,
}

impl CurvePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The identity curve, `(0,0)-(255,255)`.
pub fn default_curve_points() -> Vec<CurvePoint> {
    vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(255.0, 255.0)]
}

/// One of the four independently editable curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveChannel {
    Rgb,
    Red,
    Green,
    Blue,
}

/// Master and per-channel tone curves.
///
/// Each channel keeps at least two points sorted by x, with the first point
/// pinned to x = 0 and the last to x = 255.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorCurves {
    pub rgb: Vec<CurvePoint>,
    pub red: Vec<CurvePoint>,
    pub green: Vec<CurvePoint>,
    pub blue: Vec<CurvePoint>,
}

impl Default for ColorCurves {
    fn default() -> Self {
        Self {
            rgb: default_curve_points(),
            red: default_curve_points(),
            green: default_curve_points(),
            blue: default_curve_points(),
        }
    }
}

impl ColorCurves {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel(&self, channel: CurveChannel) -> &[CurvePoint] {
        match channel {
            CurveChannel::Rgb => &self.rgb,
            CurveChannel::Red => &self.red,
            CurveChannel::Green => &self.green,
            CurveChannel::Blue => &self.blue,
        }
    }

    fn channel_mut(&mut self, channel: CurveChannel) -> &mut Vec<CurvePoint> {
        match channel {
            CurveChannel::Rgb => &mut self.rgb,
            CurveChannel::Red => &mut self.red,
            CurveChannel::Green => &mut self.green,
            CurveChannel::Blue => &mut self.blue,
        }
    }

    /// True if any channel differs from the identity curve.
    pub fn is_modified(&self) -> bool {
        let identity = default_curve_points();
        [&self.rgb, &self.red, &self.green, &self.blue]
            .into_iter()
            .any(|points| curve::is_modified(points, &identity))
    }

    /// Insert a control point, keeping the channel sorted by x.
    ///
    /// Returns the index the point landed at. A point sharing x with an
    /// existing one replaces its y instead of adding a duplicate.
    pub fn add_point(&mut self, channel: CurveChannel, point: CurvePoint) -> usize {
        let point = clamp_point(point);
        let points = self.channel_mut(channel);

        if let Some(i) = points.iter().position(|p| p.x == point.x) {
            points[i].y = point.y;
            return i;
        }

        let index = points.partition_point(|p| p.x < point.x);
        points.insert(index, point);
        index
    }

    /// Move the point at `index`.
    ///
    /// Endpoints keep their pinned x and only move vertically. Interior
    /// points are kept strictly between their neighbours so ordering holds.
    pub fn move_point(&mut self, channel: CurveChannel, index: usize, point: CurvePoint) {
        let point = clamp_point(point);
        let points = self.channel_mut(channel);
        let len = points.len();
        if index >= len {
            return;
        }

        let x = if index == 0 {
            0.0
        } else if index == len - 1 {
            255.0
        } else {
            let lo = points[index - 1].x + 1.0;
            let hi = points[index + 1].x - 1.0;
            point.x.min(hi).max(lo)
        };

        points[index] = CurvePoint::new(x, point.y);
    }

    /// Remove an interior point. Endpoints cannot be removed.
    pub fn remove_point(&mut self, channel: CurveChannel, index: usize) -> bool {
        let points = self.channel_mut(channel);
        if index == 0 || index + 1 >= points.len() {
            return false;
        }
        points.remove(index);
        true
    }

    pub fn reset_channel(&mut self, channel: CurveChannel) {
        *self.channel_mut(channel) = default_curve_points();
    }
}

fn clamp_point(point: CurvePoint) -> CurvePoint {
    CurvePoint::new(point.x.clamp(0.0, 255.0), point.y.clamp(0.0, 255.0))
}
