//! Tone curve lookup tables built by piecewise-linear interpolation.
//!
//! Curves are sparse control points in 0–255 on both axes. Each integer
//! input is mapped through the segment that brackets it. Two LUT flavours
//! exist: normalized floats (0.0–1.0) for previews and composition, and
//! rounded bytes for raster application.

use crate::{ColorCurves, CurvePoint};

// ============================================================================
// LUT Construction
// ============================================================================

/// Build a 256-entry normalized LUT (values in 0.0–1.0).
///
/// Fewer than two points yields a constant mid-gray table.
pub fn build_lut(points: &[CurvePoint]) -> [f32; 256] {
    if points.len() < 2 {
        return [0.5; 256];
    }

    let mut lut = [0.0f32; 256];
    for (i, value) in lut.iter_mut().enumerate() {
        *value = (interpolate(points, i as f32) / 255.0).clamp(0.0, 1.0);
    }
    lut
}

/// Build a 256-entry byte LUT (values rounded to 0–255).
///
/// Same bracketing rule as [`build_lut`]; fewer than two points yields
/// constant 128.
pub fn build_lut_256(points: &[CurvePoint]) -> [u8; 256] {
    if points.len() < 2 {
        return [128; 256];
    }

    let mut lut = [0u8; 256];
    for (i, value) in lut.iter_mut().enumerate() {
        *value = interpolate(points, i as f32).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// True if `points` differs from `default_points` in length or in any
/// coordinate. Exact comparison, no tolerance.
pub fn is_modified(points: &[CurvePoint], default_points: &[CurvePoint]) -> bool {
    points.len() != default_points.len()
        || points
            .iter()
            .zip(default_points)
            .any(|(a, b)| a.x != b.x || a.y != b.y)
}

/// Render a normalized LUT as space-separated values for an SVG
/// `feFuncR`/`feFuncG`/`feFuncB` `tableValues` attribute.
pub fn curve_table_values(points: &[CurvePoint]) -> String {
    build_lut(points)
        .iter()
        .map(|v| format!("{:.4}", v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Evaluate the curve at `x` with linear interpolation between the
/// bracketing pair. Out-of-range inputs take the first or last point's y.
fn interpolate(points: &[CurvePoint], x: f32) -> f32 {
    let first = points[0];
    let last = points[points.len() - 1];

    if x <= first.x {
        return first.y;
    }
    if x >= last.x {
        return last.y;
    }

    for pair in points.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        if p1.x <= x && x <= p2.x {
            let span = p2.x - p1.x;
            if span <= 0.0 {
                return p1.y;
            }
            let t = (x - p1.x) / span;
            return p1.y + t * (p2.y - p1.y);
        }
    }

    last.y
}

// ============================================================================
// Channel Composition
// ============================================================================

/// Final per-channel byte tables: master RGB curve, then the channel curve.
#[derive(Debug, Clone)]
pub struct ChannelLuts {
    pub red: [u8; 256],
    pub green: [u8; 256],
    pub blue: [u8; 256],
}

impl ChannelLuts {
    /// Compose the master curve with each channel curve:
    /// `final[x] = channel[round(master[x] * 255)]`.
    pub fn from_curves(curves: &ColorCurves) -> Self {
        let master = build_lut(&curves.rgb);
        Self {
            red: compose(&master, &build_lut_256(&curves.red)),
            green: compose(&master, &build_lut_256(&curves.green)),
            blue: compose(&master, &build_lut_256(&curves.blue)),
        }
    }

    /// Identity tables (no change).
    pub fn identity() -> Self {
        let mut lut = [0u8; 256];
        for (i, value) in lut.iter_mut().enumerate() {
            *value = i as u8;
        }
        Self {
            red: lut,
            green: lut,
            blue: lut,
        }
    }

    /// Check if all three tables are identity.
    pub fn is_identity(&self) -> bool {
        [&self.red, &self.green, &self.blue]
            .iter()
            .all(|lut| lut.iter().enumerate().all(|(i, &v)| v == i as u8))
    }
}

impl Default for ChannelLuts {
    fn default() -> Self {
        Self::identity()
    }
}

fn compose(master: &[f32; 256], channel: &[u8; 256]) -> [u8; 256] {
    let mut out = [0u8; 256];
    for (value, &m) in out.iter_mut().zip(master.iter()) {
        let index = (m * 255.0).round().clamp(0.0, 255.0) as usize;
        *value = channel[index];
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_curve_points;

    fn darken_midtones() -> Vec<CurvePoint> {
        vec![
            CurvePoint::new(0.0, 0.0),
            CurvePoint::new(128.0, 64.0),
            CurvePoint::new(255.0, 255.0),
        ]
    }

    #[test]
    fn test_identity_curve_lut() {
        let lut = build_lut(&default_curve_points());
        for (x, &v) in lut.iter().enumerate() {
            let expected = x as f32 / 255.0;
            assert!((v - expected).abs() <= 1.0 / 255.0, "LUT mismatch at {x}: {v}");
        }
    }

    #[test]
    fn test_identity_curve_lut_256() {
        let lut = build_lut_256(&default_curve_points());
        for (x, &v) in lut.iter().enumerate() {
            assert_eq!(v as usize, x);
        }
    }

    #[test]
    fn test_degenerate_points_mid_gray() {
        assert!(build_lut(&[]).iter().all(|&v| v == 0.5));
        assert!(build_lut(&[CurvePoint::new(10.0, 200.0)])
            .iter()
            .all(|&v| v == 0.5));
        assert!(build_lut_256(&[]).iter().all(|&v| v == 128));
    }

    #[test]
    fn test_endpoints_match_points() {
        let points = darken_midtones();
        let lut = build_lut(&points);
        assert_eq!(lut[0], 0.0);
        assert_eq!(lut[255], 1.0);
        assert_eq!(lut[128], 64.0 / 255.0);
    }

    #[test]
    fn test_interpolates_between_points() {
        let lut = build_lut_256(&darken_midtones());
        assert_eq!(lut[64], 32);
        assert_eq!(lut[128], 64);
        // 64 + (63 / 127) * 191 = 158.75
        assert_eq!(lut[191], 159);
    }

    #[test]
    fn test_out_of_range_uses_endpoints() {
        let points = vec![CurvePoint::new(20.0, 40.0), CurvePoint::new(200.0, 220.0)];
        let lut = build_lut_256(&points);
        assert_eq!(lut[0], 40);
        assert_eq!(lut[10], 40);
        assert_eq!(lut[255], 220);
    }

    #[test]
    fn test_vertical_segment_takes_first_y() {
        let points = vec![
            CurvePoint::new(0.0, 0.0),
            CurvePoint::new(100.0, 50.0),
            CurvePoint::new(100.0, 200.0),
            CurvePoint::new(255.0, 255.0),
        ];
        let lut = build_lut_256(&points);
        assert_eq!(lut[100], 50);
    }

    #[test]
    fn test_is_modified_exact() {
        let identity = default_curve_points();
        assert!(!is_modified(&identity, &identity));

        let mut moved = identity.clone();
        moved[1].y = 254.0;
        assert!(is_modified(&moved, &identity));

        let mut nudged = identity.clone();
        nudged[0].x = 0.001;
        assert!(is_modified(&nudged, &identity));

        assert!(is_modified(&darken_midtones(), &identity));
    }

    #[test]
    fn test_channel_luts_identity() {
        let luts = ChannelLuts::from_curves(&ColorCurves::default());
        assert!(luts.is_identity());
        assert!(ChannelLuts::identity().is_identity());
    }

    #[test]
    fn test_master_then_channel_composition() {
        let mut curves = ColorCurves::default();
        curves.rgb = darken_midtones();
        // Red channel inverts.
        curves.red = vec![CurvePoint::new(0.0, 255.0), CurvePoint::new(255.0, 0.0)];

        let luts = ChannelLuts::from_curves(&curves);
        assert_eq!(luts.green[128], 64);
        assert_eq!(luts.blue[128], 64);
        // master 128 -> 64, then inverted: 255 - 64
        assert_eq!(luts.red[128], 191);
    }

    #[test]
    fn test_curve_table_values() {
        let s = curve_table_values(&default_curve_points());
        let values: Vec<&str> = s.split(' ').collect();
        assert_eq!(values.len(), 256);
        assert_eq!(values[0], "0.0000");
        assert_eq!(values[255], "1.0000");
    }
}
