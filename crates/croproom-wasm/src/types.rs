//! WASM-compatible wrapper types.
//!
//! JavaScript-friendly wrappers around the core image and export types, plus
//! the `JsValue` conversion helpers shared by the binding modules.

use croproom_core::{EncodedBuffer, RasterImage};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

/// A decoded, upright source image.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory. `pixels()` copies it into a
/// `Uint8Array`; keep the image on the WASM side and pass it by reference to
/// the export functions instead of round-tripping the pixels.
#[wasm_bindgen]
pub struct JsRasterImage {
    inner: RasterImage,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Wrap RGBA pixel data (4 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsRasterImage {
        JsRasterImage {
            inner: RasterImage::new(width, height, pixels),
        }
    }

    /// Image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// True once the image has pixels matching its dimensions.
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    /// Returns RGBA pixel data as a Uint8Array copy.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer releases it otherwise.
    pub fn free(self) {}
}

impl JsRasterImage {
    pub(crate) fn from_raster(inner: RasterImage) -> Self {
        Self { inner }
    }

    pub(crate) fn raster(&self) -> &RasterImage {
        &self.inner
    }
}

/// One encoded export file.
#[wasm_bindgen]
pub struct JsEncodedFile {
    inner: EncodedBuffer,
}

#[wasm_bindgen]
impl JsEncodedFile {
    /// Encoded bytes as a Uint8Array copy.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// Suggested filename, including extension
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.inner.filename.clone()
    }

    /// MIME type, e.g. `image/png`
    #[wasm_bindgen(getter, js_name = mimeType)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type.clone()
    }
}

impl From<EncodedBuffer> for JsEncodedFile {
    fn from(inner: EncodedBuffer) -> Self {
        Self { inner }
    }
}

/// Deserialize a JS object, treating `undefined`/`null` as the default.
pub(crate) fn from_js_or_default<T>(value: JsValue, what: &str) -> Result<T, JsValue>
where
    T: DeserializeOwned + Default,
{
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

/// Deserialize a required JS object.
pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

pub(crate) fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

pub(crate) fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_raster_image_creation() {
        let img = JsRasterImage::new(100, 50, vec![0u8; 100 * 50 * 4]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20_000);
        assert!(img.is_ready());
    }

    #[test]
    fn test_js_raster_image_not_ready() {
        let img = JsRasterImage::new(10, 10, Vec::new());
        assert!(!img.is_ready());
    }

    #[test]
    fn test_from_raster_keeps_pixels() {
        let pixels = vec![255u8, 128, 64, 255, 16, 8, 4, 255];
        let img = JsRasterImage::from_raster(RasterImage::new(2, 1, pixels.clone()));
        assert_eq!(img.pixels(), pixels);
        assert_eq!(img.raster().width, 2);
    }

    #[test]
    fn test_encoded_file_accessors() {
        let file = JsEncodedFile::from(EncodedBuffer {
            bytes: vec![1, 2, 3],
            filename: "edited-1-of-2.png".to_string(),
            mime_type: "image/png".to_string(),
        });
        assert_eq!(file.bytes(), vec![1, 2, 3]);
        assert_eq!(file.filename(), "edited-1-of-2.png");
        assert_eq!(file.mime_type(), "image/png");
    }
}
