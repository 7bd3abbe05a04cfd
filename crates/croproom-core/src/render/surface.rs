//! Off-screen RGBA drawing surfaces.

use thiserror::Error;

/// Largest edge length a surface may have.
pub const MAX_SURFACE_DIMENSION: u32 = 16_384;

/// Largest pixel count a surface may have: a 512 MiB RGBA buffer.
pub const MAX_SURFACE_AREA: u64 = 16_384 * 8_192;

/// A drawing surface could not be created.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderSurfaceError {
    #[error("Surface dimensions {width}x{height} exceed the supported limit")]
    TooLarge { width: u32, height: u32 },

    #[error("Surface of {width}x{height} has zero area")]
    Empty { width: u32, height: u32 },

    #[error("Failed to allocate {bytes} bytes for a {width}x{height} surface")]
    Allocation { width: u32, height: u32, bytes: usize },
}

/// A straight-alpha RGBA8 pixel buffer, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl Surface {
    /// Allocate a fully transparent surface.
    ///
    /// Fails instead of aborting when the dimensions are out of range or the
    /// allocation cannot be satisfied.
    pub fn try_new(width: u32, height: u32) -> Result<Self, RenderSurfaceError> {
        check_dimensions(width, height)?;

        let bytes = width as usize * height as usize * 4;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(bytes)
            .map_err(|_| RenderSurfaceError::Allocation {
                width,
                height,
                bytes,
            })?;
        pixels.resize(bytes, 0);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap an existing RGBA buffer. Returns `None` if the length does not
    /// match the dimensions.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Copy pixels from a surface of the same size.
    pub fn copy_from(&mut self, other: &Surface) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.pixels.copy_from_slice(&other.pixels);
    }

    /// Copy the column range `[x, x + width)` into a new surface.
    pub fn crop_columns(&self, x: u32, width: u32) -> Result<Surface, RenderSurfaceError> {
        let mut out = Surface::try_new(width, self.height)?;
        let src_stride = self.width as usize * 4;
        let dst_stride = width as usize * 4;
        let offset = x as usize * 4;
        for row in 0..self.height as usize {
            let src = row * src_stride + offset;
            let dst = row * dst_stride;
            out.pixels[dst..dst + dst_stride].copy_from_slice(&self.pixels[src..src + dst_stride]);
        }
        Ok(out)
    }
}

/// Reject empty surfaces and anything past the edge or area limits.
fn check_dimensions(width: u32, height: u32) -> Result<(), RenderSurfaceError> {
    if width == 0 || height == 0 {
        return Err(RenderSurfaceError::Empty { width, height });
    }
    if width > MAX_SURFACE_DIMENSION
        || height > MAX_SURFACE_DIMENSION
        || width as u64 * height as u64 > MAX_SURFACE_AREA
    {
        return Err(RenderSurfaceError::TooLarge { width, height });
    }
    Ok(())
}
