//! Film grain noise.

use rand::Rng;

use crate::render::Surface;

/// Add uniform noise to R, G and B.
///
/// Each pixel draws one sample `(r - 0.5) * intensity * sqrt(scale_factor)`
/// and adds it to all three color channels, clamping to 0–255. The square
/// root keeps grain perceptually constant as output resolution grows.
/// Alpha is kept. The random source is injected so tests can seed it.
pub fn apply_grain<R: Rng + ?Sized>(
    surface: &mut Surface,
    intensity: f32,
    scale_factor: f32,
    rng: &mut R,
) {
    if intensity <= 0.0 {
        return;
    }

    let amplitude = (intensity / 100.0) * 100.0 * scale_factor.max(0.0).sqrt();
    for px in surface.pixels.chunks_exact_mut(4) {
        let noise = (rng.gen::<f32>() - 0.5) * amplitude;
        for c in &mut px[..3] {
            *c = (*c as f32 + noise).round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray(w: u32, h: u32) -> Surface {
        Surface::from_rgba(w, h, [128, 128, 128, 200].repeat((w * h) as usize)).unwrap()
    }

    #[test]
    fn test_zero_intensity_noop() {
        let mut s = gray(4, 4);
        let mut rng = StdRng::seed_from_u64(1);
        apply_grain(&mut s, 0.0, 1.0, &mut rng);
        assert_eq!(s, gray(4, 4));
    }

    #[test]
    fn test_seeded_grain_is_deterministic() {
        let mut a = gray(8, 8);
        let mut b = gray(8, 8);
        apply_grain(&mut a, 40.0, 2.0, &mut StdRng::seed_from_u64(7));
        apply_grain(&mut b, 40.0, 2.0, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_ne!(a, gray(8, 8));
    }

    #[test]
    fn test_noise_bounded_and_shared_across_channels() {
        let mut s = gray(16, 16);
        apply_grain(&mut s, 100.0, 1.0, &mut StdRng::seed_from_u64(3));
        for px in s.pixels.chunks_exact(4) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert!((px[0] as i32 - 128).abs() <= 50);
            assert_eq!(px[3], 200);
        }
    }

    #[test]
    fn test_scale_factor_widens_noise() {
        let spread = |scale: f32| {
            let mut s = gray(32, 32);
            apply_grain(&mut s, 20.0, scale, &mut StdRng::seed_from_u64(11));
            s.pixels
                .chunks_exact(4)
                .map(|px| (px[0] as i32 - 128).abs())
                .max()
                .unwrap_or(0)
        };
        assert!(spread(16.0) > spread(1.0));
    }
}
