//! Tonal quantization.

use crate::render::Surface;

/// Number of levels per channel for a posterize intensity (0–100).
///
/// Ranges from 16 at low intensity down to 2 at full intensity.
pub fn posterize_levels(intensity: f32) -> u32 {
    let levels = (16.0 - (intensity / 100.0) * 14.0).round();
    levels.max(2.0) as u32
}

/// Quantize R, G and B to [`posterize_levels`] steps. Alpha is kept.
pub fn apply_posterize(surface: &mut Surface, intensity: f32) {
    if intensity <= 0.0 {
        return;
    }

    let levels = posterize_levels(intensity) as f32;
    let mut table = [0u8; 256];
    for (v, out) in table.iter_mut().enumerate() {
        let step = (v as f32 / 255.0 * levels).round();
        *out = (step / levels * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    for px in surface.pixels.chunks_exact_mut(4) {
        px[0] = table[px[0] as usize];
        px[1] = table[px[1] as usize];
        px[2] = table[px[2] as usize];
    }
}
