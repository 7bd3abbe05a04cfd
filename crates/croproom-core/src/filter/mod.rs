//! Declarative filter chains.
//!
//! Adjustments and named filters are translated into an ordered list of
//! compositing filter primitives (the CSS `filter` vocabulary). The preview
//! hands the chain to the host's compositor as a string; the export path
//! evaluates the same primitives on pixels (see [`apply`]).
//!
//! ## Chain Order
//! 1. Adjustments: exposure, saturation, brilliance, shadows
//! 2. Standard filters: invert, sepia, black & white
//! 3. Stylized composites: vintage, warm, cool, fade
//! 4. Blur
//!
//! Primitives apply sequentially and do not commute, so this order is fixed.

pub mod apply;

use std::fmt;

use crate::{Adjustments, FilterSettings};

pub use apply::{apply_filter_chain, gaussian_blur_rgba};

/// One compositing filter primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterPrimitive {
    /// Multiply each channel. 1 is neutral.
    Brightness(f32),
    /// Scale distance from mid-gray. 1 is neutral.
    Contrast(f32),
    /// Saturation multiplier. 1 is neutral.
    Saturate(f32),
    /// Amount 0–1.
    Grayscale(f32),
    /// Amount 0–1.
    Sepia(f32),
    /// Amount 0–1.
    Invert(f32),
    /// Hue rotation in degrees.
    HueRotate(f32),
    /// Gaussian standard deviation in pixels.
    Blur(f32),
}

impl FilterPrimitive {
    pub fn is_blur(&self) -> bool {
        matches!(self, FilterPrimitive::Blur(_))
    }
}

impl fmt::Display for FilterPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FilterPrimitive::Brightness(v) => write!(f, "brightness({})", css_number(v)),
            FilterPrimitive::Contrast(v) => write!(f, "contrast({})", css_number(v)),
            FilterPrimitive::Saturate(v) => write!(f, "saturate({})", css_number(v)),
            FilterPrimitive::Grayscale(v) => write!(f, "grayscale({})", css_number(v)),
            FilterPrimitive::Sepia(v) => write!(f, "sepia({})", css_number(v)),
            FilterPrimitive::Invert(v) => write!(f, "invert({})", css_number(v)),
            FilterPrimitive::HueRotate(v) => write!(f, "hue-rotate({}deg)", css_number(v)),
            FilterPrimitive::Blur(v) => write!(f, "blur({}px)", css_number(v)),
        }
    }
}

/// Format with at most four decimals and no trailing zeros.
fn css_number(value: f32) -> String {
    let s = format!("{:.4}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Ordered list of filter primitives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain {
    primitives: Vec<FilterPrimitive>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, primitive: FilterPrimitive) {
        self.primitives.push(primitive);
    }

    pub fn primitives(&self) -> &[FilterPrimitive] {
        &self.primitives
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Split into the non-blur primitives and the blur primitives, each
    /// keeping its relative order.
    pub fn split_blur(&self) -> (FilterChain, FilterChain) {
        let (blur, rest): (Vec<_>, Vec<_>) =
            self.primitives.iter().copied().partition(FilterPrimitive::is_blur);
        (
            FilterChain { primitives: rest },
            FilterChain { primitives: blur },
        )
    }

    /// Insert `primitive` ahead of any trailing blur.
    fn insert_before_blur(&mut self, primitive: FilterPrimitive) {
        let index = self
            .primitives
            .iter()
            .position(FilterPrimitive::is_blur)
            .unwrap_or(self.primitives.len());
        self.primitives.insert(index, primitive);
    }
}

impl FromIterator<FilterPrimitive> for FilterChain {
    fn from_iter<I: IntoIterator<Item = FilterPrimitive>>(iter: I) -> Self {
        Self {
            primitives: iter.into_iter().collect(),
        }
    }
}

/// CSS `filter` value. An empty chain renders as `none`.
impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.primitives.is_empty() {
            return f.write_str("none");
        }
        for (i, primitive) in self.primitives.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", primitive)?;
        }
        Ok(())
    }
}

/// Build the ordered filter chain for a set of adjustments and filters.
///
/// Inputs at their neutral value (0) are skipped. `scale_factor` scales
/// resolution-dependent primitives (blur) so exports denser than the
/// preview get a visually equivalent radius.
pub fn build_filter_chain(
    adjustments: &Adjustments,
    filters: &FilterSettings,
    scale_factor: f32,
) -> FilterChain {
    use FilterPrimitive::*;

    let mut chain = FilterChain::new();

    // Adjustments
    if adjustments.exposure != 0.0 {
        chain.push(Brightness(1.0 + adjustments.exposure / 100.0));
    }
    if adjustments.saturation != 0.0 {
        chain.push(Saturate(1.0 + adjustments.saturation / 100.0));
    }
    if adjustments.brilliance != 0.0 {
        chain.push(Contrast(1.0 + adjustments.brilliance / 100.0));
    }
    if adjustments.shadows != 0.0 {
        chain.push(Brightness(1.0 + adjustments.shadows / 200.0));
    }

    // Standard filters
    if filters.invert != 0.0 {
        chain.push(Invert(filters.invert / 100.0));
    }
    if filters.sepia != 0.0 {
        chain.push(Sepia(filters.sepia / 100.0));
    }
    if filters.black_and_white != 0.0 {
        chain.push(Grayscale(filters.black_and_white / 100.0));
    }

    // Stylized composites
    if filters.vintage != 0.0 {
        let i = filters.vintage / 100.0;
        chain.push(Sepia(0.4 * i));
        chain.push(Saturate(1.0 - 0.2 * i));
        chain.push(Contrast(1.0 - 0.1 * i));
    }
    if filters.warm != 0.0 {
        let i = filters.warm / 100.0;
        chain.push(Sepia(0.3 * i));
        chain.push(Saturate(1.0 + 0.2 * i));
        chain.push(Brightness(1.0 + 0.05 * i));
    }
    if filters.cool != 0.0 {
        let i = filters.cool / 100.0;
        chain.push(Saturate(1.0 - 0.2 * i));
        chain.push(HueRotate(15.0 * i));
        chain.push(Brightness(1.0 - 0.05 * i));
    }
    if filters.fade != 0.0 {
        let i = filters.fade / 100.0;
        chain.push(Contrast(1.0 - 0.3 * i));
        chain.push(Brightness(1.0 + 0.1 * i));
    }

    // Blur last
    if filters.blur != 0.0 {
        chain.push(Blur(filters.blur / 10.0 * scale_factor));
    }

    chain
}

/// Which contrast coefficient approximates sharpness.
///
/// Preview and export deliberately use different coefficients
/// (`/500` vs `/100 × 0.15`), so they do not match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharpnessProfile {
    Preview,
    Export,
}

/// Contrast boost standing in for sharpening, or `None` at 0.
pub fn sharpness_primitive(sharpness: f32, profile: SharpnessProfile) -> Option<FilterPrimitive> {
    if sharpness <= 0.0 {
        return None;
    }
    let amount = match profile {
        SharpnessProfile::Preview => 1.0 + sharpness / 500.0,
        SharpnessProfile::Export => 1.0 + sharpness / 100.0 * 0.15,
    };
    Some(FilterPrimitive::Contrast(amount))
}

/// Chain for the live preview: the standard chain at scale 1 with the
/// preview sharpness contrast placed before blur.
pub fn preview_filter_chain(adjustments: &Adjustments, filters: &FilterSettings) -> FilterChain {
    let mut chain = build_filter_chain(adjustments, filters, 1.0);
    if let Some(sharpen) = sharpness_primitive(adjustments.sharpness, SharpnessProfile::Preview) {
        chain.insert_before_blur(sharpen);
    }
    chain
}
