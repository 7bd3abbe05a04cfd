//! Reference decoder for hosts without their own.
//!
//! Accepts JPEG and PNG bytes, corrects EXIF orientation and hands back an
//! upright RGBA [`RasterImage`]. Camera-native formats are rejected; the
//! host converts them before they reach the core.

mod reader;
mod types;

pub use reader::{decode_image, get_orientation};
pub use types::{DecodeError, Orientation, RasterImage};
