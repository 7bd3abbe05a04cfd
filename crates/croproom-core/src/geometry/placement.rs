//! Image placement inside a container: "cover", "contain" and the
//! zoomed image footprint used as crop bounds.

use super::{rect_pixels_to_percent, Point, Rect, Rotation, Size};
use crate::settings::Transform;

/// Place an image so it covers `container`, scaled further by `zoom`.
///
/// The base scale is the larger of the two container/image ratios. The
/// focal point (0–100 per axis) selects which part of the scaled image is
/// visible: `offset = (container - scaled) * focal / 100`. The same formula
/// positions a scaled image smaller than the container, where the focal
/// point then controls letterbox placement instead of panning.
///
/// Returns the image rectangle in container pixels.
pub fn compute_cover_placement(container: Size, image: Size, zoom: f64, focal: Point) -> Rect {
    if container.is_degenerate() || image.is_degenerate() {
        return Rect::new(0.0, 0.0, container.width.max(0.0), container.height.max(0.0));
    }

    let scale = (container.width / image.width).max(container.height / image.height) * zoom;
    let width = image.width * scale;
    let height = image.height * scale;

    Rect {
        x: (container.width - width) * (focal.x / 100.0),
        y: (container.height - height) * (focal.y / 100.0),
        width,
        height,
    }
}

/// Fit an image entirely inside `container`, centered, preserving aspect
/// ratio. For 90°/270° the rotated footprint (width and height swapped) is
/// what gets fitted.
///
/// Returns the footprint rectangle in container pixels.
pub fn compute_contain_placement(container: Size, image: Size, rotation: Rotation) -> Rect {
    let footprint = rotation.rotated_size(image);
    if container.is_degenerate() || footprint.is_degenerate() {
        return Rect::new(0.0, 0.0, container.width.max(0.0), container.height.max(0.0));
    }

    let scale = (container.width / footprint.width).min(container.height / footprint.height);
    let width = footprint.width * scale;
    let height = footprint.height * scale;

    Rect {
        x: (container.width - width) / 2.0,
        y: (container.height - height) / 2.0,
        width,
        height,
    }
}

/// The displayed footprint of the transformed image, in container percent.
///
/// Starts from the contain placement of the rotated image and scales it by
/// the transform's zoom around the container center. Pan is not included:
/// it moves pixels within this footprint and is applied when drawing.
/// The result may extend past 0–100 when zoomed in.
pub fn image_bounds(container: Size, natural: Size, transform: &Transform) -> Rect {
    let fitted = compute_contain_placement(container, natural, transform.rotation);
    let center = fitted.center();
    let width = fitted.width * transform.zoom;
    let height = fitted.height * transform.zoom;

    let zoomed = Rect {
        x: center.x - width / 2.0,
        y: center.y - height / 2.0,
        width,
        height,
    };

    rect_pixels_to_percent(zoomed, container)
}
