//! Radial darkening toward the corners.

use crate::render::Surface;

/// Fraction of the radius that stays fully clear.
const INNER_RADIUS: f32 = 0.3;

/// Overlay opacity at the full radius for intensity 100.
const MAX_OPACITY: f32 = 0.7;

/// Opacity of the black overlay at `distance` from the center.
///
/// Zero inside `0.3 * radius`, rising linearly to
/// `intensity / 100 * 0.7` at `radius` and holding that value beyond.
pub fn vignette_alpha(distance: f32, radius: f32, intensity: f32) -> f32 {
    let max_alpha = (intensity / 100.0).clamp(0.0, 1.0) * MAX_OPACITY;
    let inner = radius * INNER_RADIUS;
    if radius <= 0.0 || distance <= inner {
        return 0.0;
    }
    let t = ((distance - inner) / (radius - inner)).min(1.0);
    t * max_alpha
}

/// Composite a black radial gradient over the surface with source-over
/// blending. The radius is half the larger surface dimension.
pub fn apply_vignette(surface: &mut Surface, intensity: f32) {
    if intensity <= 0.0 {
        return;
    }

    let (w, h) = (surface.width as usize, surface.height as usize);
    let cx = w as f32 / 2.0;
    let cy = h as f32 / 2.0;
    let radius = w.max(h) as f32 / 2.0;

    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let alpha = vignette_alpha((dx * dx + dy * dy).sqrt(), radius, intensity);
            if alpha <= 0.0 {
                continue;
            }

            let i = (y * w + x) * 4;
            let px = &mut surface.pixels[i..i + 4];
            let dst_a = px[3] as f32 / 255.0;
            let out_a = alpha + dst_a * (1.0 - alpha);
            if out_a <= 0.0 {
                continue;
            }
            // Black source contributes nothing to color.
            let keep = dst_a * (1.0 - alpha) / out_a;
            for c in &mut px[..3] {
                *c = (*c as f32 * keep).round().clamp(0.0, 255.0) as u8;
            }
            px[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(w: u32, h: u32) -> Surface {
        Surface::from_rgba(w, h, [255, 255, 255, 255].repeat((w * h) as usize)).unwrap()
    }

    #[test]
    fn test_alpha_profile() {
        assert_eq!(vignette_alpha(0.0, 100.0, 100.0), 0.0);
        assert_eq!(vignette_alpha(30.0, 100.0, 100.0), 0.0);
        assert!((vignette_alpha(100.0, 100.0, 100.0) - 0.7).abs() < 1e-6);
        assert!((vignette_alpha(65.0, 100.0, 100.0) - 0.35).abs() < 1e-6);
        assert!((vignette_alpha(150.0, 100.0, 50.0) - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_zero_intensity_noop() {
        let mut s = white(10, 10);
        apply_vignette(&mut s, 0.0);
        assert_eq!(s, white(10, 10));
    }

    #[test]
    fn test_center_clear_corners_dark() {
        let mut s = white(100, 60);
        apply_vignette(&mut s, 100.0);
        assert_eq!(s.pixel(50, 30), [255, 255, 255, 255]);
        let corner = s.pixel(0, 0);
        assert!(corner[0] < 200);
        assert_eq!(corner[3], 255);
    }

    #[test]
    fn test_transparent_pixels_gain_black() {
        let mut s = Surface::try_new(20, 20).unwrap();
        apply_vignette(&mut s, 100.0);
        let corner = s.pixel(0, 0);
        assert_eq!(&corner[..3], &[0, 0, 0]);
        assert!(corner[3] > 0);
    }
}
