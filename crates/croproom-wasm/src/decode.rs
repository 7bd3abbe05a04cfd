//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@croproom/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::{js_error, JsRasterImage};
use croproom_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a JPEG or PNG file into an upright RGBA image.
///
/// EXIF orientation is applied, so `width`/`height` are the natural
/// dimensions the editor works with.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported format or the file is
/// corrupted or truncated.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsRasterImage::from_raster)
        .map_err(js_error)
}

/// EXIF orientation tag (1-8) of a JPEG, or 1 when absent.
#[wasm_bindgen]
pub fn exif_orientation(bytes: &[u8]) -> u8 {
    decode::get_orientation(bytes) as u8
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use croproom_core::export::encode_png;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_png() {
        let png = encode_png(&[10, 20, 30, 255].repeat(6), 3, 2).unwrap();
        let image = decode_image(&png).unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.byte_length(), 24);
    }

    #[wasm_bindgen_test]
    fn test_decode_garbage_fails() {
        assert!(decode_image(&[1, 2, 3, 4]).is_err());
    }
}
