//! The export pipeline.
//!
//! ## Stage Order
//! 1. Reject an image that is not ready
//! 2. Convert the container-relative crop to image-relative percent
//! 3. Size the output and derive the scale factor
//! 4. Draw the transformed source
//! 5. Filter chain without blur, then blur at the scale factor
//! 6. Curves (only when modified)
//! 7. Posterize, grain, vignette
//! 8. Export sharpness
//! 9. Slice and encode
//!
//! Stages do not commute; reordering them changes the output.

use rand::Rng;
use tracing::debug;

use super::draw::{draw_transformed, DrawPlan};
use super::surface::Surface;
use crate::curve::ChannelLuts;
use crate::decode::RasterImage;
use crate::effects::{apply_curves, apply_grain, apply_posterize, apply_vignette};
use crate::export::{encode_surface, export_filename, split_surface, EncodedBuffer, ExportError};
use crate::filter::{
    apply_filter_chain, build_filter_chain, sharpness_primitive, FilterChain, SharpnessProfile,
};
use crate::geometry::{container_to_image_crop, Rect, Size};
use crate::settings::{EditSettings, ExportOptions};

/// Resolution multiplier for size-dependent effects.
///
/// `max(1, max(width, height) / reference_size)`: outputs no larger than
/// the reference render blur and grain exactly like the preview.
pub fn scale_factor(width: u32, height: u32, reference_size: f64) -> f32 {
    if reference_size <= 0.0 || reference_size.is_nan() {
        return 1.0;
    }
    (width.max(height) as f64 / reference_size).max(1.0) as f32
}

/// Render the edited image into a single surface.
///
/// `image_bounds` is the displayed image footprint in container percent
/// (see [`image_bounds`](crate::geometry::image_bounds)); the crop in
/// `settings` is relative to the same container. `rng` drives grain.
///
/// # Errors
///
/// [`ExportError::ImageNotReady`] if `image` has no pixels, and
/// [`ExportError::RenderSurface`] if a surface cannot be allocated.
pub fn render_surface<R: Rng + ?Sized>(
    image: &RasterImage,
    settings: &EditSettings,
    image_bounds: Rect,
    options: &ExportOptions,
    rng: &mut R,
) -> Result<Surface, ExportError> {
    if !image.is_ready() {
        return Err(ExportError::ImageNotReady);
    }

    let transform = settings.transform.normalized();
    let image_crop = container_to_image_crop(settings.crop, image_bounds);
    let natural = Size::new(image.width as f64, image.height as f64);
    let plan = DrawPlan::new(natural, &transform, image_crop);
    let scale = scale_factor(plan.width, plan.height, options.reference_size);

    debug!(
        width = plan.width,
        height = plan.height,
        scale,
        rotation = transform.rotation.degrees(),
        zoom = transform.zoom,
        "Planned export draw"
    );

    let mut surface = Surface::try_new(plan.width, plan.height)?;
    draw_transformed(image, &transform, &plan, &mut surface.pixels);

    let chain = build_filter_chain(&settings.adjustments, &settings.filters, scale);
    let (colour, blur) = chain.split_blur();
    apply_filter_chain(&mut surface, &colour)?;
    apply_filter_chain(&mut surface, &blur)?;
    debug!(chain = %chain, "Applied filter chain");

    if settings.curves.is_modified() {
        let luts = ChannelLuts::from_curves(&settings.curves);
        apply_curves(&mut surface, &luts);
        debug!("Applied tone curves");
    }

    let filters = &settings.filters;
    apply_posterize(&mut surface, filters.posterize);
    apply_grain(&mut surface, filters.grain, scale, rng);
    apply_vignette(&mut surface, filters.vignette);

    if let Some(sharpen) = sharpness_primitive(settings.adjustments.sharpness, SharpnessProfile::Export) {
        let sharpen: FilterChain = std::iter::once(sharpen).collect();
        apply_filter_chain(&mut surface, &sharpen)?;
    }

    Ok(surface)
}

/// Render and cut into the planned number of vertical slices.
pub fn render_slices<R: Rng + ?Sized>(
    image: &RasterImage,
    settings: &EditSettings,
    image_bounds: Rect,
    options: &ExportOptions,
    rng: &mut R,
) -> Result<Vec<Surface>, ExportError> {
    let surface = render_surface(image, settings, image_bounds, options, rng)?;
    let count = settings.split.split_count();
    if count <= 1 {
        return Ok(vec![surface]);
    }
    Ok(split_surface(&surface, count)?)
}

/// Render, slice and encode. Returns one buffer per slice, in order.
///
/// # Example
///
/// ```ignore
/// let bounds = image_bounds(container, natural, &settings.transform);
/// let files = render_export(&image, &settings, bounds, &ExportOptions::default(), &mut rand::thread_rng())?;
/// ```
pub fn render_export<R: Rng + ?Sized>(
    image: &RasterImage,
    settings: &EditSettings,
    image_bounds: Rect,
    options: &ExportOptions,
    rng: &mut R,
) -> Result<Vec<EncodedBuffer>, ExportError> {
    let slices = render_slices(image, settings, image_bounds, options, rng)?;
    let total = slices.len();

    slices
        .iter()
        .enumerate()
        .map(|(index, slice)| {
            let bytes = encode_surface(slice, options.format, options.jpeg_quality)?;
            debug!(index, total, bytes = bytes.len(), "Encoded slice");
            Ok(EncodedBuffer {
                bytes,
                filename: export_filename(&options.filename_stem, options.format, index, total),
                mime_type: options.format.mime_type().to_string(),
            })
        })
        .collect()
}
