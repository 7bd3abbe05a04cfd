//! Encoding, slicing and delivery of export results.

mod deliver;
mod encode;
mod split;

use thiserror::Error;

use crate::render::RenderSurfaceError;
use crate::settings::ExportFormat;

pub use deliver::{deliver_all, export_to_sink, ExportSink, SinkError};
pub use encode::{encode_jpeg, encode_png, encode_surface, EncodeError};
pub use split::{split_surface, split_widths};

/// Errors from the export pipeline.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No decoded image to export
    #[error("Image is not ready for export")]
    ImageNotReady,

    #[error("Render surface unavailable: {0}")]
    RenderSurface(#[from] RenderSurfaceError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The sink rejected file `index` of `total`
    #[error("Export {} of {total} could not be delivered: {source}", .index + 1)]
    Sink {
        index: usize,
        total: usize,
        #[source]
        source: SinkError,
    },
}

/// One encoded file ready for the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBuffer {
    pub bytes: Vec<u8>,
    /// Suggested filename, including extension.
    pub filename: String,
    pub mime_type: String,
}

/// Suggested filename for file `index` (0-based) of `total`.
///
/// A single export is `<stem>.<ext>`; slices are `<stem>-<i>-of-<n>.<ext>`
/// with a 1-based `i`.
pub fn export_filename(stem: &str, format: ExportFormat, index: usize, total: usize) -> String {
    if total <= 1 {
        format!("{}.{}", stem, format.extension())
    } else {
        format!("{}-{}-of-{}.{}", stem, index + 1, total, format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_filename() {
        assert_eq!(export_filename("edited", ExportFormat::Png, 0, 1), "edited.png");
        assert_eq!(export_filename("edited", ExportFormat::Jpeg, 0, 1), "edited.jpg");
    }

    #[test]
    fn test_slice_filenames() {
        assert_eq!(export_filename("pano", ExportFormat::Png, 0, 3), "pano-1-of-3.png");
        assert_eq!(export_filename("pano", ExportFormat::Png, 2, 3), "pano-3-of-3.png");
    }

    #[test]
    fn test_sink_error_message() {
        let err = ExportError::Sink {
            index: 1,
            total: 4,
            source: SinkError::new("disk full"),
        };
        assert_eq!(err.to_string(), "Export 2 of 4 could not be delivered: disk full");
    }
}
