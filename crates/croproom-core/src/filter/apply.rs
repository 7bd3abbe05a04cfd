//! Pixel evaluation of filter primitives.
//!
//! Color primitives are the standard compositing color matrices and
//! component transfers, evaluated on straight (non-premultiplied) RGB in
//! 0.0–1.0 with a clamp after each primitive. Alpha is never touched by a
//! color primitive. Blur is a Gaussian over premultiplied RGBA, so
//! transparent pixels carry no colour into their neighbours.
//!
//! A chain is applied by drawing the surface through the chain into a
//! scratch surface and copying the result back, so a failed scratch
//! allocation leaves the original untouched.

use image::{GrayImage, Luma};

use super::{FilterChain, FilterPrimitive};
use crate::render::{RenderSurfaceError, Surface};

/// A primitive reduced to its per-channel math.
#[derive(Debug, Clone, Copy)]
enum ColorOp {
    /// `c' = c * slope + intercept` on each of R, G, B.
    Linear { slope: f32, intercept: f32 },
    /// 3x3 matrix over (R, G, B).
    Matrix([[f32; 3]; 3]),
}

impl ColorOp {
    fn from_primitive(primitive: FilterPrimitive) -> Option<Self> {
        let op = match primitive {
            FilterPrimitive::Brightness(a) => ColorOp::Linear {
                slope: a.max(0.0),
                intercept: 0.0,
            },
            FilterPrimitive::Contrast(a) => {
                let a = a.max(0.0);
                ColorOp::Linear {
                    slope: a,
                    intercept: 0.5 - 0.5 * a,
                }
            }
            FilterPrimitive::Invert(a) => {
                let a = a.clamp(0.0, 1.0);
                ColorOp::Linear {
                    slope: 1.0 - 2.0 * a,
                    intercept: a,
                }
            }
            FilterPrimitive::Saturate(s) => ColorOp::Matrix(saturate_matrix(s.max(0.0))),
            FilterPrimitive::Grayscale(a) => ColorOp::Matrix(grayscale_matrix(a.clamp(0.0, 1.0))),
            FilterPrimitive::Sepia(a) => ColorOp::Matrix(sepia_matrix(a.clamp(0.0, 1.0))),
            FilterPrimitive::HueRotate(deg) => ColorOp::Matrix(hue_rotate_matrix(deg)),
            FilterPrimitive::Blur(_) => return None,
        };
        Some(op)
    }

    #[inline]
    fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        match *self {
            ColorOp::Linear { slope, intercept } => {
                rgb.map(|c| (c * slope + intercept).clamp(0.0, 1.0))
            }
            ColorOp::Matrix(m) => {
                let [r, g, b] = rgb;
                [
                    (m[0][0] * r + m[0][1] * g + m[0][2] * b).clamp(0.0, 1.0),
                    (m[1][0] * r + m[1][1] * g + m[1][2] * b).clamp(0.0, 1.0),
                    (m[2][0] * r + m[2][1] * g + m[2][2] * b).clamp(0.0, 1.0),
                ]
            }
        }
    }
}

fn saturate_matrix(s: f32) -> [[f32; 3]; 3] {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn grayscale_matrix(amount: f32) -> [[f32; 3]; 3] {
    let s = 1.0 - amount;
    [
        [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
    ]
}

fn sepia_matrix(amount: f32) -> [[f32; 3]; 3] {
    let s = 1.0 - amount;
    [
        [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
        [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
        [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> [[f32; 3]; 3] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

/// Run consecutive color ops over every pixel, quantizing once at the end.
fn apply_color_ops(pixels: &mut [u8], ops: &[ColorOp]) {
    if ops.is_empty() {
        return;
    }
    for px in pixels.chunks_exact_mut(4) {
        let mut rgb = [
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
        ];
        for op in ops {
            rgb = op.apply(rgb);
        }
        px[0] = (rgb[0] * 255.0).round() as u8;
        px[1] = (rgb[1] * 255.0).round() as u8;
        px[2] = (rgb[2] * 255.0).round() as u8;
    }
}

/// Gaussian blur of an RGBA surface, in place.
///
/// Colour is premultiplied by alpha before blurring and divided back out
/// afterwards. `imageproc` only blurs single-channel images, so each
/// channel is split out, blurred and written back. Non-positive sigma is a
/// no-op.
pub fn gaussian_blur_rgba(surface: &mut Surface, sigma: f32) {
    if sigma <= 0.0 || !sigma.is_finite() {
        return;
    }

    let (w, h) = (surface.width, surface.height);
    let stride = w as usize;

    premultiply(&mut surface.pixels);
    for c in 0..4 {
        let pixels = &surface.pixels;
        let channel = GrayImage::from_fn(w, h, |x, y| {
            Luma([pixels[(y as usize * stride + x as usize) * 4 + c]])
        });
        let blurred = imageproc::filter::gaussian_blur_f32(&channel, sigma);
        for (i, value) in blurred.into_raw().into_iter().enumerate() {
            surface.pixels[i * 4 + c] = value;
        }
    }
    unpremultiply(&mut surface.pixels);
}

fn premultiply(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        let a = px[3] as u16;
        for v in &mut px[..3] {
            *v = ((*v as u16 * a + 127) / 255) as u8;
        }
    }
}

fn unpremultiply(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        let a = px[3] as u16;
        match a {
            0 => px[..3].fill(0),
            255 => {}
            _ => {
                for v in &mut px[..3] {
                    *v = ((*v as u16 * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
    }
}

/// Evaluate every primitive of `primitives` on `pixels`, in order.
fn apply_primitives(surface: &mut Surface, primitives: &[FilterPrimitive]) {
    let mut pending: Vec<ColorOp> = Vec::new();
    for &primitive in primitives {
        match primitive {
            FilterPrimitive::Blur(sigma) => {
                apply_color_ops(&mut surface.pixels, &pending);
                pending.clear();
                gaussian_blur_rgba(surface, sigma);
            }
            other => {
                if let Some(op) = ColorOp::from_primitive(other) {
                    pending.push(op);
                }
            }
        }
    }
    apply_color_ops(&mut surface.pixels, &pending);
}

/// Apply a filter chain to `surface`.
///
/// The surface is drawn through the chain into a freshly allocated scratch
/// surface of the same size, the destination is cleared, and the scratch
/// content is copied back. An empty chain leaves the surface untouched.
///
/// # Errors
///
/// Returns [`RenderSurfaceError`] if the scratch surface cannot be created.
pub fn apply_filter_chain(surface: &mut Surface, chain: &FilterChain) -> Result<(), RenderSurfaceError> {
    if chain.is_empty() {
        return Ok(());
    }

    let mut scratch = Surface::try_new(surface.width, surface.height)?;
    scratch.copy_from(surface);
    apply_primitives(&mut scratch, chain.primitives());

    surface.clear();
    surface.copy_from(&scratch);
    Ok(())
}
