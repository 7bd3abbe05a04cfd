//! Geometry primitives and coordinate-space conversions.
//!
//! Two percent frames exist and must not be mixed:
//!
//! - **Container percent**: 0–100 over the visible preview box. Pointer
//!   positions and the interactive crop rectangle live here.
//! - **Image percent**: 0–100 over the rotated image's own bounding box.
//!   The export pipeline works in this frame.
//!
//! [`container_to_image_crop`] maps the first into the second using the
//! image bounds computed by [`image_bounds`].
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downward
//! - Rotations are clockwise in screen space

mod percent;
mod placement;

pub use percent::{
    container_to_image_crop, cumulative_positions, grid_lines, percent_aspect, percent_to_pixels,
    pixels_to_percent, rect_percent_to_pixels, rect_pixels_to_percent,
};
pub use placement::{compute_contain_placement, compute_cover_placement, image_bounds};

use serde::{Deserialize, Serialize};

/// Width and height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Swap width and height.
    pub fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }

    /// True when either side is zero, negative or NaN.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A 2D point or offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle. Units depend on context (pixels or percent).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Crop rectangle in percent (0–100) of its reference frame.
pub type CropArea = Rect;

/// The full frame, `{0, 0, 100, 100}`.
pub const FULL_CROP: CropArea = Rect {
    x: 0.0,
    y: 0.0,
    width: 100.0,
    height: 100.0,
};

/// Minimum crop width and height in percent units.
pub const MIN_CROP_SIZE: f64 = 10.0;

/// Allowed region for a crop rectangle, in container percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::FULL
    }
}

impl Bounds {
    /// The whole container.
    pub const FULL: Bounds = Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 100.0,
        max_y: 100.0,
    };

    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounds covering `rect`, intersected with the container (0–100).
    pub fn from_rect_clamped(rect: Rect) -> Self {
        let min_x = rect.x.clamp(0.0, 100.0);
        let min_y = rect.y.clamp(0.0, 100.0);
        Self {
            min_x,
            min_y,
            max_x: rect.right().clamp(min_x, 100.0),
            max_y: rect.bottom().clamp(min_y, 100.0),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Shift `rect` so it lies inside the bounds, shrinking it only when it
    /// is larger than the bounds on an axis.
    pub fn clamp_rect(&self, rect: Rect) -> Rect {
        let width = rect.width.min(self.width()).max(0.0);
        let height = rect.height.min(self.height()).max(0.0);
        Rect {
            x: clamp_soft(rect.x, self.min_x, self.max_x - width),
            y: clamp_soft(rect.y, self.min_y, self.max_y - height),
            width,
            height,
        }
    }

    /// True when `rect` lies inside the bounds, with `tolerance` slack.
    pub fn contains_rect(&self, rect: &Rect, tolerance: f64) -> bool {
        rect.x >= self.min_x - tolerance
            && rect.y >= self.min_y - tolerance
            && rect.right() <= self.max_x + tolerance
            && rect.bottom() <= self.max_y + tolerance
    }
}

/// Clamp that never panics: when rounding leaves `hi` a hair below `lo`,
/// the lower bound wins.
#[inline]
pub(crate) fn clamp_soft(value: f64, lo: f64, hi: f64) -> f64 {
    value.min(hi).max(lo)
}

/// Right-angle rotation. Arbitrary angles are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(into = "i32", from = "i32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Wrap `degrees` modulo 360 and snap to the nearest right angle.
    pub fn from_degrees(degrees: i32) -> Self {
        let wrapped = degrees.rem_euclid(360);
        match ((wrapped + 45) / 90) % 4 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn rotate_clockwise(self) -> Self {
        Self::from_degrees(self.degrees() + 90)
    }

    pub fn rotate_counter_clockwise(self) -> Self {
        Self::from_degrees(self.degrees() - 90)
    }

    /// 90° and 270° swap the image footprint.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Exact `(cos, sin)` of the angle, free of trigonometric rounding.
    pub fn cos_sin(self) -> (f64, f64) {
        match self {
            Rotation::Deg0 => (1.0, 0.0),
            Rotation::Deg90 => (0.0, 1.0),
            Rotation::Deg180 => (-1.0, 0.0),
            Rotation::Deg270 => (0.0, -1.0),
        }
    }

    /// Footprint of an image of `size` after this rotation.
    pub fn rotated_size(self, size: Size) -> Size {
        if self.swaps_dimensions() {
            size.transposed()
        } else {
            size
        }
    }
}

impl From<i32> for Rotation {
    fn from(degrees: i32) -> Self {
        Rotation::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}
