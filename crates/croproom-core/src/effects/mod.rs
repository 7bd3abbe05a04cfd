//! Pixel effects the declarative filter chain cannot express.
//!
//! Each effect works in place on an RGBA [`Surface`](crate::render::Surface)
//! and is a no-op at zero intensity. The export pipeline runs them in a
//! fixed order: curves, posterize, grain, vignette.

mod curves;
mod grain;
mod posterize;
mod vignette;

pub use curves::apply_curves;
pub use grain::apply_grain;
pub use posterize::{apply_posterize, posterize_levels};
pub use vignette::{apply_vignette, vignette_alpha};
