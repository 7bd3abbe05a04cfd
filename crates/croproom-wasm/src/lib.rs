//! Croproom WASM - WebAssembly bindings for Croproom
//!
//! This crate exposes the croproom-core editing and export pipeline to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrappers for images and encoded files
//! - `decode` - JPEG/PNG decoding with EXIF orientation
//! - `preview` - CSS and SVG descriptors for the live preview
//! - `crop` - Crop drag controller and aspect-ratio helpers
//! - `export` - Render, slice, encode and deliver
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, image_bounds, render_export } from '@croproom/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const bounds = image_bounds(800, 800, image.width, image.height, settings.transform);
//! const files = render_export(image, settings, bounds, { format: 'png' });
//! ```

use wasm_bindgen::prelude::*;

mod crop;
mod decode;
mod export;
mod preview;
mod types;

// Re-export public types
pub use crop::{aspect_preset_label, aspect_preset_ratio, with_aspect_lock, JsCropController};
pub use decode::{decode_image, exif_orientation};
pub use export::{export_to_sink, render_export};
pub use preview::{
    build_curve_lut, curve_table_values, grid_lines, image_bounds, preview_filter_css,
    preview_transform_css,
};
pub use types::{JsEncodedFile, JsRasterImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::debug_1(&JsValue::from_str(&format!("croproom-wasm {}", version())));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
