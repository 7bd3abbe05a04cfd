//! PNG and JPEG encoding of rendered surfaces.
//!
//! Both encoders use the `image` crate. JPEG has no alpha channel, so
//! transparent pixels are composited over black first, matching what a
//! browser canvas produces for `image/jpeg`.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use crate::render::Surface;
use crate::settings::ExportFormat;

/// Errors that can occur while encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: &'static str,
        message: String,
    },
}

fn validate(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Encode RGBA pixel data to PNG bytes (lossless, alpha kept).
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    validate(pixels, width, height)?;

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: "PNG",
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

/// Encode RGBA pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (clamped to 1-100)
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate(pixels, width, height)?;

    let rgb = flatten_over_black(pixels);
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: "JPEG",
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

/// Drop alpha by compositing each pixel over opaque black.
fn flatten_over_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = px[3] as u32;
        for &c in &px[..3] {
            rgb.push(((c as u32 * a + 127) / 255) as u8);
        }
    }
    rgb
}

/// Encode a surface in the requested format.
pub fn encode_surface(
    surface: &Surface,
    format: ExportFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    match format {
        ExportFormat::Png => encode_png(&surface.pixels, surface.width, surface.height),
        ExportFormat::Jpeg => encode_jpeg(&surface.pixels, surface.width, surface.height, jpeg_quality),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_signature_and_round_trip() {
        let pixels: Vec<u8> = (0..16u8).flat_map(|v| [v * 10, v, 255 - v, v * 15]).collect();
        let png = encode_png(&pixels, 4, 4).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.into_raw(), pixels);
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let pixels = vec![128u8; 16 * 16 * 4];
        let jpeg = encode_jpeg(&pixels, 16, 16, 95).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let pixels = vec![128u8; 8 * 8 * 4];
        assert!(encode_jpeg(&pixels, 8, 8, 0).is_ok());
        assert!(encode_jpeg(&pixels, 8, 8, 255).is_ok());
    }

    #[test]
    fn test_invalid_pixel_data() {
        let result = encode_png(&[0u8; 10], 2, 2);
        assert!(matches!(
            result,
            Err(EncodeError::InvalidPixelData {
                expected: 16,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_zero_dimensions() {
        assert!(matches!(
            encode_jpeg(&[], 0, 5, 90),
            Err(EncodeError::InvalidDimensions { width: 0, height: 5 })
        ));
    }

    #[test]
    fn test_flatten_over_black() {
        assert_eq!(flatten_over_black(&[200, 100, 50, 255]), vec![200, 100, 50]);
        assert_eq!(flatten_over_black(&[200, 100, 50, 0]), vec![0, 0, 0]);
        assert_eq!(flatten_over_black(&[200, 100, 50, 128]), vec![100, 50, 25]);
    }

    #[test]
    fn test_encode_surface_dispatches_on_format() {
        let surface = Surface::from_rgba(2, 2, vec![255; 16]).unwrap();
        let png = encode_surface(&surface, ExportFormat::Png, 95).unwrap();
        let jpeg = encode_surface(&surface, ExportFormat::Jpeg, 95).unwrap();
        assert_eq!(png[1], b'P');
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }
}
