//! Pointer and wheel state machines that turn raw input into transform deltas.

/// Press/move/release dragging.
pub mod drag;
/// Shared transform state and callbacks.
pub mod state;
/// Wheel zoom, panning and animated transitions.
pub mod zoom;

pub use drag::{Drag, DragPhase};
pub use state::{GestureCallback, GestureTransform, TransformState};
pub use zoom::{Zoom, ZoomPhase};
