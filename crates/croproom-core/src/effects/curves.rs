//! Tone curve application.

use crate::curve::ChannelLuts;
use crate::render::Surface;

/// Remap R, G and B through the composed channel tables. Alpha is kept.
pub fn apply_curves(surface: &mut Surface, luts: &ChannelLuts) {
    for px in surface.pixels.chunks_exact_mut(4) {
        px[0] = luts.red[px[0] as usize];
        px[1] = luts.green[px[1] as usize];
        px[2] = luts.blue[px[2] as usize];
    }
}
