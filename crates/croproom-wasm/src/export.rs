//! Export WASM bindings.
//!
//! Rendering and encoding run synchronously on the WASM side. Delivery is
//! asynchronous: the host sink may return a Promise (a download, a share
//! sheet) and the next slice waits for it plus the pacing delay.
//!
//! # Example
//!
//! ```typescript
//! const bounds = image_bounds(cw, ch, image.width, image.height, settings.transform);
//! const delivered = await export_to_sink(image, settings, bounds, { format: 'jpeg' },
//!   async (file) => {
//!     const blob = new Blob([file.bytes()], { type: file.mimeType });
//!     await navigator.share({ files: [new File([blob], file.filename)] });
//!   });
//! ```

use crate::types::{from_js, from_js_or_default, js_error, JsEncodedFile, JsRasterImage};
use croproom_core::{EditSettings, EncodedBuffer, ExportError, ExportOptions, Rect, SinkError};
use gloo_timers::future::TimeoutFuture;
use js_sys::{Array, Function, Promise};
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

/// Render, slice and encode the edited image.
///
/// # Arguments
/// * `image` - The decoded source
/// * `settings` - `EditSettings` object; missing fields take defaults
/// * `image_bounds` - `{x, y, width, height}` from `image_bounds`
/// * `options` - `ExportOptions` object, or `undefined` for PNG defaults
///
/// # Returns
/// An array of `JsEncodedFile`, one per slice, in left-to-right order.
#[wasm_bindgen]
pub fn render_export(
    image: &JsRasterImage,
    settings: JsValue,
    image_bounds: JsValue,
    options: JsValue,
) -> Result<Array, JsValue> {
    let (files, _) = render(image, settings, image_bounds, options)?;
    Ok(files
        .into_iter()
        .map(|file| JsValue::from(JsEncodedFile::from(file)))
        .collect())
}

/// Render the export and hand each file to `sink` in order.
///
/// `sink` is called with one `JsEncodedFile` at a time. If it returns a
/// Promise the next file waits for it to settle; consecutive hand-offs are
/// separated by `options.slicePacingMs`. A throw or rejection stops the
/// sequence and rejects the returned Promise with a message naming the
/// failed slice; files already delivered stay delivered.
///
/// Resolves to the number of files delivered.
#[wasm_bindgen]
pub fn export_to_sink(
    image: &JsRasterImage,
    settings: JsValue,
    image_bounds: JsValue,
    options: JsValue,
    sink: Function,
) -> Result<Promise, JsValue> {
    let (files, pacing_ms) = render(image, settings, image_bounds, options)?;
    Ok(future_to_promise(async move {
        let delivered = deliver(files, &sink, pacing_ms).await?;
        Ok(JsValue::from(delivered as u32))
    }))
}

fn render(
    image: &JsRasterImage,
    settings: JsValue,
    image_bounds: JsValue,
    options: JsValue,
) -> Result<(Vec<EncodedBuffer>, u32), JsValue> {
    let settings: EditSettings = from_js_or_default(settings, "edit settings")?;
    let bounds: Rect = from_js(image_bounds, "image bounds")?;
    let options: ExportOptions = from_js_or_default(options, "export options")?;

    let files = croproom_core::render_export(
        image.raster(),
        &settings,
        bounds,
        &options,
        &mut rand::thread_rng(),
    )
    .map_err(js_error)?;

    let pacing_ms = u32::try_from(options.slice_pacing_ms).unwrap_or(u32::MAX);
    Ok((files, pacing_ms))
}

async fn deliver(files: Vec<EncodedBuffer>, sink: &Function, pacing_ms: u32) -> Result<usize, JsValue> {
    let total = files.len();
    for (index, file) in files.into_iter().enumerate() {
        if index > 0 {
            TimeoutFuture::new(pacing_ms).await;
        }

        let filename = file.filename.clone();
        let bytes = file.bytes.len();
        if let Err(reason) = hand_off(sink, file).await {
            let err = ExportError::Sink {
                index,
                total,
                source: SinkError::new(js_message(&reason)),
            };
            warn!(index, total, filename = %filename, error = %err, "Sink rejected export");
            return Err(js_error(err));
        }
        info!(index, total, filename = %filename, bytes, "Delivered export");
    }
    Ok(total)
}

async fn hand_off(sink: &Function, file: EncodedBuffer) -> Result<(), JsValue> {
    let result = sink.call1(&JsValue::NULL, &JsValue::from(JsEncodedFile::from(file)))?;
    if let Ok(promise) = result.dyn_into::<Promise>() {
        JsFuture::from(promise).await?;
    }
    Ok(())
}

/// Best-effort text for a thrown value.
fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use croproom_core::geometry::FULL_CROP;
    use croproom_core::{ExportFormat, SplitPlan};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn js<T: serde::Serialize>(value: &T) -> JsValue {
        serde_wasm_bindgen::to_value(value).unwrap()
    }

    fn gray(width: u32, height: u32) -> JsRasterImage {
        JsRasterImage::new(width, height, [128, 128, 128, 255].repeat((width * height) as usize))
    }

    #[wasm_bindgen_test]
    fn test_render_export_single_png() {
        let files = render_export(&gray(8, 4), JsValue::UNDEFINED, js(&FULL_CROP), JsValue::UNDEFINED).unwrap();
        assert_eq!(files.length(), 1);
    }

    #[wasm_bindgen_test]
    fn test_render_export_slices() {
        let mut settings = EditSettings::default();
        settings.split = SplitPlan::new(3);
        let options = ExportOptions::with_format(ExportFormat::Jpeg);
        let files = render_export(&gray(30, 4), js(&settings), js(&FULL_CROP), js(&options)).unwrap();
        assert_eq!(files.length(), 3);
    }

    #[wasm_bindgen_test]
    fn test_not_ready_image_rejected() {
        let empty = JsRasterImage::new(10, 10, Vec::new());
        assert!(render_export(&empty, JsValue::UNDEFINED, js(&FULL_CROP), JsValue::UNDEFINED).is_err());
    }

    #[wasm_bindgen_test]
    async fn test_export_to_sink_delivers_all() {
        let mut settings = EditSettings::default();
        settings.split = SplitPlan::new(2);
        let options = ExportOptions {
            slice_pacing_ms: 0,
            ..ExportOptions::default()
        };
        let sink = Function::new_no_args("");
        let promise = export_to_sink(&gray(20, 4), js(&settings), js(&FULL_CROP), js(&options), sink).unwrap();
        let delivered = JsFuture::from(promise).await.unwrap();
        assert_eq!(delivered.as_f64(), Some(2.0));
    }

    #[wasm_bindgen_test]
    async fn test_export_to_sink_stops_on_throw() {
        let sink = Function::new_no_args("throw new Error('dismissed')");
        let promise =
            export_to_sink(&gray(8, 4), JsValue::UNDEFINED, js(&FULL_CROP), JsValue::UNDEFINED, sink).unwrap();
        let err = JsFuture::from(promise).await.unwrap_err();
        assert_eq!(err.as_string().unwrap(), "Export 1 of 1 could not be delivered: dismissed");
    }
}
