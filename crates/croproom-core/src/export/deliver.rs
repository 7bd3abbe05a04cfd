//! Hand-off of encoded files to the host sink.
//!
//! The sink is whatever the host uses to save or share a file. Files are
//! delivered one at a time with a fixed pause between consecutive
//! hand-offs; the first rejection stops the sequence.

use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

use super::{EncodedBuffer, ExportError};
use crate::decode::RasterImage;
use crate::geometry::Rect;
use crate::render::render_export;
use crate::settings::{EditSettings, ExportOptions};

/// The host sink rejected a file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SinkError {
    pub message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Destination for encoded export files.
pub trait ExportSink {
    /// Save or share one file.
    fn deliver(&mut self, file: &EncodedBuffer) -> Result<(), SinkError>;
}

impl<F> ExportSink for F
where
    F: FnMut(&EncodedBuffer) -> Result<(), SinkError>,
{
    fn deliver(&mut self, file: &EncodedBuffer) -> Result<(), SinkError> {
        self(file)
    }
}

/// Deliver `files` in order.
///
/// `pause(pacing)` runs between consecutive hand-offs, never before the
/// first or after the last. Delivery stops at the first rejection, which is
/// reported with its 0-based index; files already delivered stay delivered.
pub fn deliver_all<S, P>(
    files: &[EncodedBuffer],
    sink: &mut S,
    pacing: Duration,
    mut pause: P,
) -> Result<(), ExportError>
where
    S: ExportSink + ?Sized,
    P: FnMut(Duration),
{
    let total = files.len();
    for (index, file) in files.iter().enumerate() {
        if index > 0 {
            pause(pacing);
        }

        if let Err(source) = sink.deliver(file) {
            warn!(index, total, filename = %file.filename, error = %source, "Sink rejected export");
            return Err(ExportError::Sink {
                index,
                total,
                source,
            });
        }
        info!(index, total, filename = %file.filename, bytes = file.bytes.len(), "Delivered export");
    }
    Ok(())
}

/// Render, encode and deliver in one call.
///
/// Returns the number of files delivered.
#[allow(clippy::too_many_arguments)]
pub fn export_to_sink<R, S, P>(
    image: &RasterImage,
    settings: &EditSettings,
    image_bounds: Rect,
    options: &ExportOptions,
    rng: &mut R,
    sink: &mut S,
    pause: P,
) -> Result<usize, ExportError>
where
    R: Rng + ?Sized,
    S: ExportSink + ?Sized,
    P: FnMut(Duration),
{
    let files = render_export(image, settings, image_bounds, options, rng)?;
    deliver_all(&files, sink, Duration::from_millis(options.slice_pacing_ms), pause)?;
    Ok(files.len())
}
