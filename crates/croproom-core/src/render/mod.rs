//! Export rendering.
//!
//! Turns a source image plus [`EditSettings`](crate::settings::EditSettings)
//! into final pixel surfaces at full resolution, reproducing what the
//! interactive preview shows.

mod draw;
mod pipeline;
mod surface;

pub use draw::{draw_transformed, DrawPlan};
pub use pipeline::{render_export, render_slices, render_surface, scale_factor};
pub use surface::{RenderSurfaceError, Surface, MAX_SURFACE_AREA, MAX_SURFACE_DIMENSION};
