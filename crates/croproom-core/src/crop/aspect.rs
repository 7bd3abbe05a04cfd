//! Aspect-ratio locking.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, CropArea, Rect, Size, MIN_CROP_SIZE};

/// Common crop ratios offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AspectPreset {
    #[default]
    Free,
    /// The image's own ratio after rotation.
    Original,
    Square,
    R4_3,
    R3_4,
    R3_2,
    R2_3,
    R16_9,
    R9_16,
}

impl AspectPreset {
    /// Width / height in pixels, or `None` for a free crop.
    ///
    /// `rotated_natural` is only consulted by [`AspectPreset::Original`].
    pub fn pixel_ratio(self, rotated_natural: Size) -> Option<f64> {
        match self {
            AspectPreset::Free => None,
            AspectPreset::Original => {
                if rotated_natural.is_degenerate() {
                    None
                } else {
                    Some(rotated_natural.width / rotated_natural.height)
                }
            }
            AspectPreset::Square => Some(1.0),
            AspectPreset::R4_3 => Some(4.0 / 3.0),
            AspectPreset::R3_4 => Some(3.0 / 4.0),
            AspectPreset::R3_2 => Some(3.0 / 2.0),
            AspectPreset::R2_3 => Some(2.0 / 3.0),
            AspectPreset::R16_9 => Some(16.0 / 9.0),
            AspectPreset::R9_16 => Some(9.0 / 16.0),
        }
    }

    /// Swap portrait and landscape.
    pub fn flipped(self) -> Self {
        match self {
            AspectPreset::R4_3 => AspectPreset::R3_4,
            AspectPreset::R3_4 => AspectPreset::R4_3,
            AspectPreset::R3_2 => AspectPreset::R2_3,
            AspectPreset::R2_3 => AspectPreset::R3_2,
            AspectPreset::R16_9 => AspectPreset::R9_16,
            AspectPreset::R9_16 => AspectPreset::R16_9,
            other => other,
        }
    }
}

impl fmt::Display for AspectPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AspectPreset::Free => "Free",
            AspectPreset::Original => "Original",
            AspectPreset::Square => "1:1",
            AspectPreset::R4_3 => "4:3",
            AspectPreset::R3_4 => "3:4",
            AspectPreset::R3_2 => "3:2",
            AspectPreset::R2_3 => "2:3",
            AspectPreset::R16_9 => "16:9",
            AspectPreset::R9_16 => "9:16",
        };
        f.write_str(label)
    }
}

/// Re-derive `crop` for a newly chosen ratio (percent units).
///
/// The result keeps the old crop's center. The wider or taller axis is
/// contracted to hit the ratio, the rectangle is grown back up to the
/// minimum size if needed, scaled down to fit `bounds`, and finally shifted
/// inside them. `None` (free) only clamps the crop.
pub fn with_aspect_lock(crop: CropArea, ratio: Option<f64>, bounds: Bounds) -> CropArea {
    let Some(ratio) = ratio.filter(|r| r.is_finite() && *r > 0.0) else {
        return bounds.clamp_rect(crop);
    };

    let center = crop.center();
    let (mut width, mut height) = (crop.width.max(0.0), crop.height.max(0.0));

    if height <= 0.0 || width / height > ratio {
        width = height * ratio;
    } else {
        height = width / ratio;
    }

    // Floor
    if width < MIN_CROP_SIZE || height < MIN_CROP_SIZE {
        let grow = (MIN_CROP_SIZE / width.max(f64::MIN_POSITIVE))
            .max(MIN_CROP_SIZE / height.max(f64::MIN_POSITIVE));
        width *= grow;
        height *= grow;
    }

    // Fit
    if width > bounds.width() || height > bounds.height() {
        let shrink = (bounds.width() / width).min(bounds.height() / height);
        width *= shrink;
        height *= shrink;
    }

    bounds.clamp_rect(Rect::new(
        center.x - width / 2.0,
        center.y - height / 2.0,
        width,
        height,
    ))
}
