//! Pointer-driven crop editing.
//!
//! [`crop_drag_update`] is the pure per-frame rule: given the crop as it was
//! when the drag started and the pointer delta since then, it returns the
//! new crop. [`CropDragController`] wraps it in an explicit
//! idle/dragging state machine that the host feeds pointer events into.
//!
//! All coordinates are container percent. A locked aspect ratio is in the
//! same percent units (see [`percent_aspect`](crate::geometry::percent_aspect)).

use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, CropArea, Point, Rect, MIN_CROP_SIZE};

/// The part of the crop rectangle being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragHandle {
    Move,
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl DragHandle {
    pub const ALL: [DragHandle; 9] = [
        DragHandle::Move,
        DragHandle::N,
        DragHandle::S,
        DragHandle::E,
        DragHandle::W,
        DragHandle::NE,
        DragHandle::NW,
        DragHandle::SE,
        DragHandle::SW,
    ];

    /// Direction each axis grows in: `+1` toward right/bottom, `-1` toward
    /// left/top, `0` when the handle does not drive that axis.
    pub fn signs(self) -> (f64, f64) {
        match self {
            DragHandle::Move => (0.0, 0.0),
            DragHandle::N => (0.0, -1.0),
            DragHandle::S => (0.0, 1.0),
            DragHandle::E => (1.0, 0.0),
            DragHandle::W => (-1.0, 0.0),
            DragHandle::NE => (1.0, -1.0),
            DragHandle::NW => (-1.0, -1.0),
            DragHandle::SE => (1.0, 1.0),
            DragHandle::SW => (-1.0, 1.0),
        }
    }

    pub fn is_corner(self) -> bool {
        matches!(self, DragHandle::NE | DragHandle::NW | DragHandle::SE | DragHandle::SW)
    }

    pub fn is_edge(self) -> bool {
        matches!(self, DragHandle::N | DragHandle::S | DragHandle::E | DragHandle::W)
    }

    /// Find the handle under `point`.
    ///
    /// Corners win over edges, edges over the interior. `tolerance` is the
    /// grab distance in percent. Returns `None` outside the crop.
    pub fn hit_test(point: Point, crop: &CropArea, tolerance: f64) -> Option<DragHandle> {
        let near = |a: f64, b: f64| (a - b).abs() <= tolerance;
        let within_x = point.x >= crop.x - tolerance && point.x <= crop.right() + tolerance;
        let within_y = point.y >= crop.y - tolerance && point.y <= crop.bottom() + tolerance;
        if !within_x || !within_y {
            return None;
        }

        let left = near(point.x, crop.x);
        let right = near(point.x, crop.right());
        let top = near(point.y, crop.y);
        let bottom = near(point.y, crop.bottom());

        let handle = match (left, right, top, bottom) {
            (true, _, true, _) => DragHandle::NW,
            (_, true, true, _) => DragHandle::NE,
            (true, _, _, true) => DragHandle::SW,
            (_, true, _, true) => DragHandle::SE,
            (true, _, _, _) => DragHandle::W,
            (_, true, _, _) => DragHandle::E,
            (_, _, true, _) => DragHandle::N,
            (_, _, _, true) => DragHandle::S,
            _ => DragHandle::Move,
        };
        Some(handle)
    }
}

/// Compute the crop for one pointer-move frame.
///
/// # Arguments
///
/// * `crop_start` - The crop when the drag began
/// * `delta` - Pointer movement since the drag began, in percent
/// * `handle` - What is being dragged
/// * `aspect` - Locked width/height ratio in percent units, or `None`
/// * `bounds` - The image footprint the crop must stay inside
///
/// Every branch finishes by shifting the rectangle back inside `bounds`.
pub fn crop_drag_update(
    crop_start: CropArea,
    delta: Point,
    handle: DragHandle,
    aspect: Option<f64>,
    bounds: Bounds,
) -> CropArea {
    let aspect = aspect.filter(|r| r.is_finite() && *r > 0.0);

    let rect = match (handle, aspect) {
        (DragHandle::Move, _) => Rect {
            x: crop_start.x + delta.x,
            y: crop_start.y + delta.y,
            ..crop_start
        },
        (_, None) => resize_free(crop_start, delta, handle, &bounds),
        (_, Some(ratio)) if handle.is_corner() => resize_locked_corner(crop_start, delta, handle, ratio, &bounds),
        (_, Some(ratio)) => resize_locked_edge(crop_start, delta, handle, ratio, &bounds),
    };

    bounds.clamp_rect(rect)
}

/// Length clamp where the floor wins over the ceiling.
fn clamp_len(value: f64, floor: f64, ceiling: f64) -> f64 {
    value.min(ceiling).max(floor)
}

/// Resize one axis from its anchored opposite edge.
///
/// Returns the new `(start, length)` on that axis.
fn resize_axis(start: f64, length: f64, delta: f64, sign: f64, min: f64, max: f64, floor: f64) -> (f64, f64) {
    if sign > 0.0 {
        let len = clamp_len(length + delta, floor, max - start);
        (start, len)
    } else if sign < 0.0 {
        let anchor = start + length;
        let len = clamp_len(length - delta, floor, anchor - min);
        (anchor - len, len)
    } else {
        (start, length)
    }
}

fn resize_free(start: CropArea, delta: Point, handle: DragHandle, bounds: &Bounds) -> CropArea {
    let (sx, sy) = handle.signs();
    let floor_w = MIN_CROP_SIZE.min(bounds.width());
    let floor_h = MIN_CROP_SIZE.min(bounds.height());

    let (x, width) = resize_axis(start.x, start.width, delta.x, sx, bounds.min_x, bounds.max_x, floor_w);
    let (y, height) = resize_axis(start.y, start.height, delta.y, sy, bounds.min_y, bounds.max_y, floor_h);

    Rect::new(x, y, width, height)
}

/// Smallest and largest width a crop locked to `ratio` can have.
fn locked_width_limits(ratio: f64, bounds: &Bounds) -> (f64, f64) {
    let largest = bounds.width().min(bounds.height() * ratio).max(0.0);
    let smallest = MIN_CROP_SIZE.max(MIN_CROP_SIZE * ratio).min(largest);
    (smallest, largest)
}

fn resize_locked_edge(
    start: CropArea,
    delta: Point,
    handle: DragHandle,
    ratio: f64,
    bounds: &Bounds,
) -> CropArea {
    let (sx, sy) = handle.signs();
    let (min_w, max_w) = locked_width_limits(ratio, bounds);
    let center = start.center();

    if sx != 0.0 {
        // Horizontal edge drives width; height follows, centered vertically.
        let (anchor, avail) = if sx > 0.0 {
            (start.x, bounds.max_x - start.x)
        } else {
            (start.right(), start.right() - bounds.min_x)
        };
        let width = clamp_len(start.width + sx * delta.x, min_w, avail.min(max_w));
        let height = width / ratio;
        let x = if sx > 0.0 { anchor } else { anchor - width };
        Rect::new(x, center.y - height / 2.0, width, height)
    } else {
        // Vertical edge drives height; width follows, centered horizontally.
        let (min_h, max_h) = (min_w / ratio, max_w / ratio);
        let (anchor, avail) = if sy > 0.0 {
            (start.y, bounds.max_y - start.y)
        } else {
            (start.bottom(), start.bottom() - bounds.min_y)
        };
        let height = clamp_len(start.height + sy * delta.y, min_h, avail.min(max_h));
        let width = height * ratio;
        let y = if sy > 0.0 { anchor } else { anchor - height };
        Rect::new(center.x - width / 2.0, y, width, height)
    }
}

fn resize_locked_corner(
    start: CropArea,
    delta: Point,
    handle: DragHandle,
    ratio: f64,
    bounds: &Bounds,
) -> CropArea {
    let (sx, sy) = handle.signs();
    let (min_w, max_w) = locked_width_limits(ratio, bounds);

    // Anchor is the opposite corner.
    let anchor_x = if sx > 0.0 { start.x } else { start.right() };
    let anchor_y = if sy > 0.0 { start.y } else { start.bottom() };

    let drive_x = sx * delta.x;
    let drive_y = sy * delta.y * ratio;
    let drive = if drive_x.abs() >= drive_y.abs() { drive_x } else { drive_y };

    let avail_x = if sx > 0.0 { bounds.max_x - anchor_x } else { anchor_x - bounds.min_x };
    let avail_y = if sy > 0.0 { bounds.max_y - anchor_y } else { anchor_y - bounds.min_y };
    let ceiling = avail_x.min(avail_y * ratio).min(max_w);

    let width = clamp_len(start.width + drive, min_w, ceiling);
    let height = width / ratio;

    let x = if sx > 0.0 { anchor_x } else { anchor_x - width };
    let y = if sy > 0.0 { anchor_y } else { anchor_y - height };
    Rect::new(x, y, width, height)
}

/// Drag state. While dragging, the pointer and crop at drag start are held
/// so every frame is computed from the same origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        handle: DragHandle,
        pointer_start: Point,
        crop_start: CropArea,
    },
}

/// Explicit state machine for crop dragging.
///
/// The host routes pointer events in; the controller owns no listeners, so
/// releasing a drag leaves nothing behind.
///
/// # Example
///
/// ```ignore
/// let mut drag = CropDragController::new(bounds);
/// drag.pointer_down(DragHandle::SE, pointer, crop);
/// if let Some(next) = drag.pointer_move(pointer_now) {
///     crop = next;
/// }
/// drag.pointer_up();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CropDragController {
    state: DragState,
    aspect: Option<f64>,
    bounds: Bounds,
}

impl CropDragController {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            state: DragState::Idle,
            aspect: None,
            bounds,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn aspect(&self) -> Option<f64> {
        self.aspect
    }

    /// Set the ratio (percent units) used by subsequent resizes.
    pub fn set_aspect(&mut self, aspect: Option<f64>) {
        self.aspect = aspect.filter(|r| r.is_finite() && *r > 0.0);
    }

    /// Start dragging `handle`. Ignored if a drag is already active.
    pub fn pointer_down(&mut self, handle: DragHandle, pointer: Point, crop: CropArea) {
        if self.is_dragging() {
            return;
        }
        self.state = DragState::Dragging {
            handle,
            pointer_start: pointer,
            crop_start: crop,
        };
    }

    /// Crop for the current pointer position, or `None` when idle.
    pub fn pointer_move(&self, pointer: Point) -> Option<CropArea> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging {
                handle,
                pointer_start,
                crop_start,
            } => Some(crop_drag_update(
                crop_start,
                pointer - pointer_start,
                handle,
                self.aspect,
                self.bounds,
            )),
        }
    }

    /// Finish the drag.
    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }

    /// Abandon the drag. The host keeps whatever crop it last applied.
    pub fn pointer_cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crop(x: f64, y: f64, w: f64, h: f64) -> CropArea {
        Rect::new(x, y, w, h)
    }

    fn assert_rect(actual: Rect, expected: Rect) {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
        assert!(
            close(actual.x, expected.x)
                && close(actual.y, expected.y)
                && close(actual.width, expected.width)
                && close(actual.height, expected.height),
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn test_move_translates() {
        let r = crop_drag_update(crop(10.0, 10.0, 30.0, 30.0), Point::new(5.0, -5.0), DragHandle::Move, None, Bounds::FULL);
        assert_rect(r, crop(15.0, 5.0, 30.0, 30.0));
    }

    #[test]
    fn test_move_clamps_flush_to_boundary() {
        let r = crop_drag_update(
            crop(60.0, 60.0, 30.0, 30.0),
            Point::new(50.0, -200.0),
            DragHandle::Move,
            None,
            Bounds::FULL,
        );
        assert_rect(r, crop(70.0, 0.0, 30.0, 30.0));
    }

    #[test]
    fn test_free_east_edge_anchors_west() {
        let r = crop_drag_update(crop(20.0, 20.0, 40.0, 40.0), Point::new(15.0, 99.0), DragHandle::E, None, Bounds::FULL);
        assert_rect(r, crop(20.0, 20.0, 55.0, 40.0));
    }

    #[test]
    fn test_free_west_edge_anchors_east() {
        let r = crop_drag_update(crop(20.0, 20.0, 40.0, 40.0), Point::new(-50.0, 0.0), DragHandle::W, None, Bounds::FULL);
        // Right edge stays at 60; left stops at the boundary.
        assert_rect(r, crop(0.0, 20.0, 60.0, 40.0));
    }

    #[test]
    fn test_free_edge_enforces_minimum() {
        let r = crop_drag_update(crop(20.0, 20.0, 40.0, 40.0), Point::new(0.0, 100.0), DragHandle::N, None, Bounds::FULL);
        assert_rect(r, crop(20.0, 50.0, 40.0, MIN_CROP_SIZE));
    }

    #[test]
    fn test_free_corner_independent_axes() {
        let r = crop_drag_update(crop(20.0, 20.0, 40.0, 40.0), Point::new(10.0, -5.0), DragHandle::NE, None, Bounds::FULL);
        assert_rect(r, crop(20.0, 15.0, 50.0, 45.0));
    }

    #[test]
    fn test_locked_edge_recenters_perpendicular() {
        let r = crop_drag_update(crop(20.0, 20.0, 40.0, 40.0), Point::new(10.0, 0.0), DragHandle::E, Some(1.0), Bounds::FULL);
        // Width 50 -> height 50, centered on the old vertical center (40).
        assert_rect(r, crop(20.0, 15.0, 50.0, 50.0));
    }

    #[test]
    fn test_locked_edge_limited_by_other_axis() {
        let bounds = Bounds::new(0.0, 25.0, 100.0, 75.0);
        let r = crop_drag_update(crop(0.0, 30.0, 20.0, 20.0), Point::new(90.0, 0.0), DragHandle::E, Some(1.0), bounds);
        // Height cannot exceed 50, so width stops at 50 too.
        assert_rect(r, crop(0.0, 25.0, 50.0, 50.0));
    }

    #[test]
    fn test_locked_corner_keeps_anchor() {
        let r = crop_drag_update(crop(20.0, 20.0, 40.0, 20.0), Point::new(-10.0, -2.0), DragHandle::NW, Some(2.0), Bounds::FULL);
        // x drives: width 50, height 25; SE corner (60, 40) stays put.
        assert_rect(r, crop(10.0, 15.0, 50.0, 25.0));
    }

    #[test]
    fn test_locked_corner_y_drives_when_larger() {
        let r = crop_drag_update(crop(10.0, 10.0, 20.0, 20.0), Point::new(1.0, 10.0), DragHandle::SE, Some(1.0), Bounds::FULL);
        assert_rect(r, crop(10.0, 10.0, 30.0, 30.0));
    }

    #[test]
    fn test_locked_corner_clamped_to_available_extent() {
        let r = crop_drag_update(crop(50.0, 50.0, 20.0, 20.0), Point::new(80.0, 80.0), DragHandle::SE, Some(1.0), Bounds::FULL);
        assert_rect(r, crop(50.0, 50.0, 50.0, 50.0));
    }

    #[test]
    fn test_hit_test() {
        let c = crop(20.0, 20.0, 40.0, 40.0);
        assert_eq!(DragHandle::hit_test(Point::new(20.5, 19.5), &c, 2.0), Some(DragHandle::NW));
        assert_eq!(DragHandle::hit_test(Point::new(60.0, 60.0), &c, 2.0), Some(DragHandle::SE));
        assert_eq!(DragHandle::hit_test(Point::new(40.0, 59.0), &c, 2.0), Some(DragHandle::S));
        assert_eq!(DragHandle::hit_test(Point::new(40.0, 40.0), &c, 2.0), Some(DragHandle::Move));
        assert_eq!(DragHandle::hit_test(Point::new(90.0, 40.0), &c, 2.0), None);
    }

    #[test]
    fn test_controller_lifecycle() {
        let mut drag = CropDragController::new(Bounds::FULL);
        assert_eq!(drag.pointer_move(Point::new(1.0, 1.0)), None);

        let start = crop(10.0, 10.0, 20.0, 20.0);
        drag.pointer_down(DragHandle::Move, Point::new(50.0, 50.0), start);
        assert!(drag.is_dragging());

        let moved = drag.pointer_move(Point::new(55.0, 52.0)).unwrap();
        assert_rect(moved, crop(15.0, 12.0, 20.0, 20.0));

        // Frames are relative to the drag start, not the previous frame.
        let moved = drag.pointer_move(Point::new(51.0, 50.0)).unwrap();
        assert_rect(moved, crop(11.0, 10.0, 20.0, 20.0));

        drag.pointer_up();
        assert_eq!(drag.state(), DragState::Idle);
        assert_eq!(drag.pointer_move(Point::new(80.0, 80.0)), None);
    }

    #[test]
    fn test_controller_cancel_releases() {
        let mut drag = CropDragController::new(Bounds::FULL);
        drag.pointer_down(DragHandle::E, Point::default(), crop(0.0, 0.0, 50.0, 50.0));
        drag.pointer_cancel();
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_controller_ignores_second_pointer_down() {
        let mut drag = CropDragController::new(Bounds::FULL);
        drag.pointer_down(DragHandle::E, Point::default(), crop(0.0, 0.0, 50.0, 50.0));
        drag.pointer_down(DragHandle::Move, Point::new(9.0, 9.0), crop(1.0, 1.0, 10.0, 10.0));
        match drag.state() {
            DragState::Dragging { handle, .. } => assert_eq!(handle, DragHandle::E),
            DragState::Idle => panic!("expected dragging"),
        }
    }

    #[test]
    fn test_controller_invalid_aspect_is_free() {
        let mut drag = CropDragController::new(Bounds::FULL);
        drag.set_aspect(Some(0.0));
        assert_eq!(drag.aspect(), None);
        drag.set_aspect(Some(f64::NAN));
        assert_eq!(drag.aspect(), None);
    }
}
