use std::rc::Rc;

use crate::events::event::{GestureEvent, RawEvent};
use crate::foundation::core::{Extent, Point, Vec2};
use crate::geometry::transform::Transform;
use crate::scene::layer::Layer;
use crate::scene::tree::NodeId;

/// Callback fired by a gesture controller with the layer and node it is bound to.
pub type GestureCallback = Rc<dyn Fn(&Layer, NodeId, &GestureEvent)>;

/// Translate and per-axis scale accumulated by a gesture.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GestureTransform {
    /// Accumulated translate.
    pub translate: Vec2,
    /// `(scale_x, scale_y)`; zoom keeps both equal.
    pub scale: Vec2,
}

impl Default for GestureTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl GestureTransform {
    /// Build from a translate and a uniform scale.
    pub fn new(translate: Vec2, scale: f64) -> Self {
        Self {
            translate,
            scale: Vec2::new(scale, scale),
        }
    }

    /// Anchor-preserving rescale from `old` to `new` about `anchor`.
    ///
    /// The layer point under `anchor` stays fixed: `(t - anchor) / scale` is
    /// invariant. A zero scale on either side collapses the translate to the anchor.
    pub fn compute(mut self, old: f64, new: f64, anchor: Point) -> Self {
        if old == 0.0 || new == 0.0 {
            self.translate = anchor.to_vec2() * (1.0 - new);
            self.scale = Vec2::new(new, new);
            return self;
        }
        let mut t = self.translate / old;
        t.x -= anchor.x / old - anchor.x / new;
        t.y -= anchor.y / old - anchor.y / new;
        self.translate = t * new;
        self.scale = Vec2::new(new, new);
        self
    }
}

impl From<GestureTransform> for Transform {
    fn from(t: GestureTransform) -> Self {
        Transform::translate(t.translate.x, t.translate.y).with_scale_xy(t.scale.x, t.scale.y)
    }
}

/// Live state of one gesture controller, overwritten in place on every event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformState {
    /// Last pointer x.
    pub x: f64,
    /// Last pointer y.
    pub y: f64,
    /// Last accepted delta x, in unscaled units.
    pub dx: f64,
    /// Last accepted delta y, in unscaled units.
    pub dy: f64,
    /// Accumulated transform.
    pub transform: GestureTransform,
}

impl TransformState {
    /// Record the pointer and clear the delta.
    pub(crate) fn reset_at(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
        self.dx = 0.0;
        self.dy = 0.0;
    }

    /// Move the pointer to `p` and translate by the pointer delta when the new
    /// translate stays inside `extent` (bounds scaled by the current scale).
    ///
    /// A rejected delta leaves the translate alone and zeroes `dx`/`dy`.
    pub(crate) fn pan_to_pointer(&mut self, p: Point, extent: Extent) -> bool {
        let delta = Vec2::new(p.x - self.x, p.y - self.y);
        self.x = p.x;
        self.y = p.y;
        let GestureTransform { translate, scale } = self.transform;
        if extent.contains_scaled(translate + delta, scale.x, scale.y) {
            self.dx = unscale(delta.x, scale.x);
            self.dy = unscale(delta.y, scale.y);
            self.transform.translate = translate + delta;
            true
        } else {
            tracing::trace!(dx = delta.x, dy = delta.y, "delta outside extent dropped");
            self.dx = 0.0;
            self.dy = 0.0;
            false
        }
    }

    /// Snapshot as an event.
    pub fn to_event(&self, raw: Option<&RawEvent>) -> GestureEvent {
        GestureEvent {
            x: self.x,
            y: self.y,
            dx: self.dx,
            dy: self.dy,
            transform: self.transform,
            raw: raw.cloned(),
        }
    }
}

/// `v` in unscaled units. Nothing survives a zero scale.
pub(crate) fn unscale<T: std::ops::Div<f64, Output = T> + Default>(v: T, scale: f64) -> T {
    if scale == 0.0 { T::default() } else { v / scale }
}

/// Invoke `callback` if set. Callers must not hold controller borrows.
pub(crate) fn fire(
    callback: Option<GestureCallback>,
    layer: &Layer,
    node: NodeId,
    event: &GestureEvent,
) {
    if let Some(cb) = callback {
        cb(layer, node, event);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gesture/state.rs"]
mod tests;
