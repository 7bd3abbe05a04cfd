//! Transformed drawing of the source image into an output surface.
//!
//! # Algorithm
//!
//! The output is a window onto the "frame": the rotated natural image
//! scaled by zoom. A source pixel `s` lands at
//!
//! ```text
//! P = (frame_center - crop_origin) + R(θ) · zoom · (s - natural/2 + pan)
//! ```
//!
//! where `pan = position% × natural` is applied in the unrotated frame.
//! Drawing uses inverse mapping: for each output pixel centre we solve for
//! `s` and sample the source with bilinear interpolation. Points that land
//! outside the source stay transparent.

use crate::decode::RasterImage;
use crate::geometry::{CropArea, Point, Size};
use crate::settings::Transform;

/// Output size and frame placement for one export draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawPlan {
    /// Output width in pixels, at least 1.
    pub width: u32,
    /// Output height in pixels, at least 1.
    pub height: u32,
    /// Size of the rotated, zoomed frame in output pixels.
    pub frame: Size,
    /// Top-left of the crop within the frame, in output pixels.
    pub crop_origin: Point,
}

impl DrawPlan {
    /// Plan the draw for an image-relative crop (percent of the frame).
    pub fn new(natural: Size, transform: &Transform, image_crop: CropArea) -> Self {
        let frame = transform.rotation.rotated_size(natural);
        let frame = Size::new(frame.width * transform.zoom, frame.height * transform.zoom);

        let width = output_length(image_crop.width, frame.width);
        let height = output_length(image_crop.height, frame.height);

        Self {
            width,
            height,
            frame,
            crop_origin: Point::new(
                image_crop.x / 100.0 * frame.width,
                image_crop.y / 100.0 * frame.height,
            ),
        }
    }
}

fn output_length(percent: f64, frame: f64) -> u32 {
    let len = (percent / 100.0 * frame).round();
    if len.is_nan() || len < 1.0 {
        1
    } else {
        len.min(u32::MAX as f64) as u32
    }
}

/// Draw `image` into an RGBA buffer of `plan.width × plan.height`.
///
/// `out` must hold exactly `width * height * 4` bytes and is fully
/// overwritten.
pub fn draw_transformed(image: &RasterImage, transform: &Transform, plan: &DrawPlan, out: &mut [u8]) {
    debug_assert_eq!(out.len(), plan.width as usize * plan.height as usize * 4);

    let natural = Size::new(image.width as f64, image.height as f64);
    let zoom = if transform.zoom > 0.0 { transform.zoom } else { 1.0 };
    let (cos, sin) = transform.rotation.cos_sin();

    let pan_x = transform.position.x / 100.0 * natural.width;
    let pan_y = transform.position.y / 100.0 * natural.height;

    // Where the source centre (before pan) lands in the output.
    let offset_x = plan.frame.width / 2.0 - plan.crop_origin.x;
    let offset_y = plan.frame.height / 2.0 - plan.crop_origin.y;

    let src_cx = natural.width / 2.0 - pan_x;
    let src_cy = natural.height / 2.0 - pan_y;

    for dst_y in 0..plan.height {
        for dst_x in 0..plan.width {
            let dx = dst_x as f64 + 0.5 - offset_x;
            let dy = dst_y as f64 + 0.5 - offset_y;

            // Inverse rotation, then undo zoom
            let src_x = (dx * cos + dy * sin) / zoom + src_cx;
            let src_y = (-dx * sin + dy * cos) / zoom + src_cy;

            let idx = (dst_y as usize * plan.width as usize + dst_x as usize) * 4;
            out[idx..idx + 4].copy_from_slice(&sample_bilinear(image, src_x, src_y));
        }
    }
}

/// Read a pixel as [f64; 4].
#[inline]
fn get_pixel_f64(image: &RasterImage, px: usize, py: usize) -> [f64; 4] {
    let idx = (py * image.width as usize + px) * 4;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
        image.pixels[idx + 3] as f64,
    ]
}

/// Sample the source at continuous coordinates where pixel `i` covers
/// `[i, i + 1)`.
///
/// Outside the source the result is transparent. Inside, the four pixel
/// centres around the point are blended, with neighbours clamped to the
/// edge so the outermost half pixel does not fade. A point on an exact
/// pixel centre returns that pixel unchanged.
fn sample_bilinear(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as f64, image.height as f64);
    if !(x >= 0.0 && x < w && y >= 0.0 && y < h) {
        return [0, 0, 0, 0];
    }

    let fx_pos = x - 0.5;
    let fy_pos = y - 0.5;

    let max_x = image.width as usize - 1;
    let max_y = image.height as usize - 1;

    let x0f = fx_pos.floor();
    let y0f = fy_pos.floor();
    let fx = fx_pos - x0f;
    let fy = fy_pos - y0f;

    let clamp_idx = |v: f64, max: usize| -> usize {
        if v <= 0.0 {
            0
        } else {
            (v as usize).min(max)
        }
    };
    let x0 = clamp_idx(x0f, max_x);
    let y0 = clamp_idx(y0f, max_y);
    let x1 = clamp_idx(x0f + 1.0, max_x);
    let y1 = clamp_idx(y0f + 1.0, max_y);

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}
