//! Input events, node bindings and dispatch.

/// Event types, raw events and bindings.
pub mod event;
/// Hit-test driven dispatch with gesture capture.
pub mod router;

pub use event::{EventBinding, EventType, GestureEvent, RawEvent};
pub use router::EventRouter;
