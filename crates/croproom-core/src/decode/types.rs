//! Source image and decode error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not a JPEG or PNG. HEIC and camera RAW files land here too.
    #[error("Unsupported image format, expected JPEG or PNG")]
    InvalidFormat,

    #[error("Could not decode image: {0}")]
    CorruptedFile(String),
}

/// EXIF orientation tag. Values 1-8 map to the variants in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Upright = 1,
    MirrorHorizontal = 2,
    Rotate180 = 3,
    MirrorVertical = 4,
    /// Mirrored across the top-left to bottom-right diagonal.
    Transpose = 5,
    /// Stored rotated; display needs a 90° clockwise turn.
    Rotate90 = 6,
    /// Mirrored across the top-right to bottom-left diagonal.
    Transverse = 7,
    Rotate270 = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::MirrorHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::MirrorVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270,
            _ => Orientation::Upright,
        }
    }
}

impl Orientation {
    /// True for the orientations stored on their side.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose | Orientation::Rotate90 | Orientation::Transverse | Orientation::Rotate270
        )
    }

    /// Stored pixel shown at upright `(x, y)`, for a stored image whose last
    /// column is `last_x` and last row is `last_y`.
    fn stored_position(self, x: u32, y: u32, last_x: u32, last_y: u32) -> (u32, u32) {
        match self {
            Orientation::Upright => (x, y),
            Orientation::MirrorHorizontal => (last_x - x, y),
            Orientation::Rotate180 => (last_x - x, last_y - y),
            Orientation::MirrorVertical => (x, last_y - y),
            Orientation::Transpose => (y, x),
            Orientation::Rotate90 => (y, last_y - x),
            Orientation::Transverse => (last_x - y, last_y - x),
            Orientation::Rotate270 => (last_x - y, x),
        }
    }
}

/// An upright, decoded source image. Read-only to the rest of the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// RGBA, row-major, 4 bytes per pixel.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// True when the image has pixels and a buffer matching its size.
    pub fn is_ready(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.pixels.len() == self.width as usize * self.height as usize * 4
    }

    /// Turn a stored image upright by remapping its RGBA pixels.
    ///
    /// Sideways orientations swap width and height. Images that are not
    /// ready come back unchanged.
    pub fn oriented(self, orientation: Orientation) -> Self {
        if orientation == Orientation::Upright || !self.is_ready() {
            return self;
        }

        let (width, height) = if orientation.swaps_dimensions() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        };
        let (last_x, last_y) = (self.width - 1, self.height - 1);
        let stride = self.width as usize;

        let mut pixels = vec![0u8; self.pixels.len()];
        for (i, dst) in pixels.chunks_exact_mut(4).enumerate() {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            let (sx, sy) = orientation.stored_position(x, y, last_x, last_y);
            let src = (sy as usize * stride + sx as usize) * 4;
            dst.copy_from_slice(&self.pixels[src..src + 4]);
        }
        Self::new(width, height, pixels)
    }

    /// Natural size as floating-point geometry.
    pub fn natural_size(&self) -> crate::geometry::Size {
        crate::geometry::Size::new(self.width as f64, self.height as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_from_tag() {
        assert_eq!(Orientation::from(1), Orientation::Upright);
        assert_eq!(Orientation::from(6), Orientation::Rotate90);
        assert_eq!(Orientation::from(8) as u8, 8);
        assert_eq!(Orientation::from(0), Orientation::Upright);
        assert_eq!(Orientation::from(99), Orientation::Upright);
    }

    #[test]
    fn test_raster_ready() {
        assert!(RasterImage::new(2, 1, vec![0; 8]).is_ready());
        assert!(!RasterImage::new(0, 0, vec![]).is_ready());
        assert!(!RasterImage::new(2, 2, vec![0; 8]).is_ready());
    }

    /// 3x2 image whose red/green channels hold the pixel's own x/y.
    fn coordinates() -> RasterImage {
        let mut pixels = Vec::new();
        for y in 0..2u8 {
            for x in 0..3u8 {
                pixels.extend_from_slice(&[x, y, 0, 255]);
            }
        }
        RasterImage::new(3, 2, pixels)
    }

    fn at(img: &RasterImage, x: u32, y: u32) -> (u8, u8) {
        let i = (y * img.width + x) as usize * 4;
        (img.pixels[i], img.pixels[i + 1])
    }

    #[test]
    fn test_oriented_upright_unchanged() {
        assert_eq!(coordinates().oriented(Orientation::Upright), coordinates());
    }

    #[test]
    fn test_oriented_sideways_swaps_size() {
        for tag in 5..=8u32 {
            let img = coordinates().oriented(Orientation::from(tag));
            assert_eq!((img.width, img.height), (2, 3), "tag {tag}");
            assert!(img.is_ready());
        }
        for tag in 1..=4u32 {
            let img = coordinates().oriented(Orientation::from(tag));
            assert_eq!((img.width, img.height), (3, 2), "tag {tag}");
        }
    }

    #[test]
    fn test_oriented_top_left_source() {
        // Which stored pixel ends up in the upright top-left corner.
        let cases = [
            (Orientation::MirrorHorizontal, (2, 0)),
            (Orientation::Rotate180, (2, 1)),
            (Orientation::MirrorVertical, (0, 1)),
            (Orientation::Transpose, (0, 0)),
            (Orientation::Rotate90, (0, 1)),
            (Orientation::Transverse, (2, 1)),
            (Orientation::Rotate270, (2, 0)),
        ];
        for (orientation, expected) in cases {
            let img = coordinates().oriented(orientation);
            assert_eq!(at(&img, 0, 0), expected, "{orientation:?}");
        }
    }

    #[test]
    fn test_oriented_rotate90_is_clockwise() {
        let img = coordinates().oriented(Orientation::Rotate90);
        // The stored left column, read bottom to top, becomes the top row.
        assert_eq!(at(&img, 0, 0), (0, 1));
        assert_eq!(at(&img, 1, 0), (0, 0));
        // The stored top-right corner ends at the bottom-right.
        assert_eq!(at(&img, 1, 2), (2, 0));
    }

    #[test]
    fn test_oriented_not_ready_passthrough() {
        let empty = RasterImage::new(4, 4, Vec::new());
        assert_eq!(empty.clone().oriented(Orientation::Rotate90), empty);
    }

    #[test]
    fn test_decode_error_display() {
        assert_eq!(
            DecodeError::InvalidFormat.to_string(),
            "Unsupported image format, expected JPEG or PNG"
        );
    }
}
