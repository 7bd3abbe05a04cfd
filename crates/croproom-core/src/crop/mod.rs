//! Interactive crop editing in container percent.

mod aspect;
mod drag;

pub use aspect::{with_aspect_lock, AspectPreset};
pub use drag::{crop_drag_update, CropDragController, DragHandle, DragState};
