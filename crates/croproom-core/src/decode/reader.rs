//! JPEG/PNG decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{ImageFormat, ImageReader};
use tracing::debug;

use super::{DecodeError, Orientation, RasterImage};

/// Decode a JPEG or PNG, apply EXIF orientation and convert to RGBA8.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for anything other than JPEG or
/// PNG (camera-native formats must be converted by the host first), and
/// `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    match reader.format() {
        Some(ImageFormat::Jpeg) | Some(ImageFormat::Png) => {}
        _ => return Err(DecodeError::InvalidFormat),
    }

    let orientation = get_orientation(bytes);
    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    debug!(
        width = img.width(),
        height = img.height(),
        ?orientation,
        "Decoded source image"
    );

    Ok(RasterImage::from_rgba_image(img.into_rgba8()).oriented(orientation))
}

/// Read the EXIF orientation. `Upright` when absent or unreadable.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Upright,
    }
}
