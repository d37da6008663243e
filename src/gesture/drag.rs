use std::cell::RefCell;
use std::rc::Rc;

use crate::events::event::{GestureEvent, RawEvent};
use crate::foundation::config::DragConfig;
use crate::foundation::core::{Extent, Point};
use crate::gesture::state::{GestureCallback, GestureTransform, TransformState, fire};
use crate::scene::layer::Layer;
use crate::scene::tree::NodeId;

/// Drag controller phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
    /// Waiting for a press.
    #[default]
    Idle,
    /// Between press and release.
    Dragging,
}

#[derive(Default)]
struct DragInner {
    phase: DragPhase,
    state: TransformState,
    extent: Extent,
    on_start: Option<GestureCallback>,
    on_drag: Option<GestureCallback>,
    on_end: Option<GestureCallback>,
}

/// Press/move/release state machine producing extent-checked translate deltas.
///
/// Cloning yields another handle to the same controller.
#[derive(Clone, Default)]
pub struct Drag {
    inner: Rc<RefCell<DragInner>>,
}

impl std::fmt::Debug for Drag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Drag")
            .field("phase", &inner.phase)
            .field("state", &inner.state)
            .field("extent", &inner.extent)
            .finish_non_exhaustive()
    }
}

impl Drag {
    /// Controller configured from `config`.
    pub fn new(config: &DragConfig) -> Self {
        let drag = Self::default();
        drag.set_extent(config.extent);
        drag
    }

    /// Fired on press.
    pub fn on_start(self, f: impl Fn(&Layer, NodeId, &GestureEvent) + 'static) -> Self {
        self.inner.borrow_mut().on_start = Some(Rc::new(f));
        self
    }

    /// Fired on every move while dragging.
    pub fn on_drag(self, f: impl Fn(&Layer, NodeId, &GestureEvent) + 'static) -> Self {
        self.inner.borrow_mut().on_drag = Some(Rc::new(f));
        self
    }

    /// Fired on release or leave.
    pub fn on_end(self, f: impl Fn(&Layer, NodeId, &GestureEvent) + 'static) -> Self {
        self.inner.borrow_mut().on_end = Some(Rc::new(f));
        self
    }

    /// Replace the translate bounds.
    pub fn set_extent(&self, extent: Extent) {
        self.inner.borrow_mut().extent = extent;
    }

    /// Seed the accumulated transform.
    pub fn set_transform(&self, transform: GestureTransform) {
        self.inner.borrow_mut().state.transform = transform;
    }

    /// Current phase.
    pub fn phase(&self) -> DragPhase {
        self.inner.borrow().phase
    }

    /// Snapshot of the live state.
    pub fn state(&self) -> TransformState {
        self.inner.borrow().state
    }

    /// Press: idle -> dragging. Ignored while already dragging.
    pub fn press(&self, layer: &Layer, node: NodeId, point: Point, raw: Option<&RawEvent>) {
        let (cb, event) = {
            let mut inner = self.inner.borrow_mut();
            if inner.phase == DragPhase::Dragging {
                return;
            }
            inner.phase = DragPhase::Dragging;
            inner.state.reset_at(point);
            (inner.on_start.clone(), inner.state.to_event(raw))
        };
        fire(cb, layer, node, &event);
    }

    /// Move while dragging; ignored while idle.
    pub fn drag_to(&self, layer: &Layer, node: NodeId, point: Point, raw: Option<&RawEvent>) {
        let (cb, event) = {
            let mut inner = self.inner.borrow_mut();
            if inner.phase == DragPhase::Idle {
                return;
            }
            let extent = inner.extent;
            inner.state.pan_to_pointer(point, extent);
            (inner.on_drag.clone(), inner.state.to_event(raw))
        };
        fire(cb, layer, node, &event);
    }

    /// Release or leave: dragging -> idle. Ignored while idle.
    pub fn release(&self, layer: &Layer, node: NodeId, point: Point, raw: Option<&RawEvent>) {
        let (cb, event) = {
            let mut inner = self.inner.borrow_mut();
            if inner.phase == DragPhase::Idle {
                return;
            }
            inner.phase = DragPhase::Idle;
            inner.state.reset_at(point);
            (inner.on_end.clone(), inner.state.to_event(raw))
        };
        fire(cb, layer, node, &event);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gesture/drag.rs"]
mod tests;
