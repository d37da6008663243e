use crate::events::event::{EventBinding, EventType, GestureEvent, RawEvent};
use crate::foundation::core::{Point, Vec2};
use crate::gesture::drag::Drag;
use crate::gesture::state::{GestureCallback, GestureTransform};
use crate::gesture::zoom::Zoom;
use crate::scene::layer::Layer;
use crate::scene::tree::NodeId;

/// Gesture controller holding the pointer between press and release.
#[derive(Clone, Debug)]
enum Capture {
    Drag(Drag),
    Zoom(Zoom),
}

impl Capture {
    fn press(&self, layer: &Layer, node: NodeId, point: Point, raw: &RawEvent) {
        match self {
            Self::Drag(d) => d.press(layer, node, point, Some(raw)),
            Self::Zoom(z) => z.press(layer, node, point, Some(raw)),
        }
    }

    fn move_to(&self, layer: &Layer, node: NodeId, point: Point, raw: &RawEvent) {
        match self {
            Self::Drag(d) => d.drag_to(layer, node, point, Some(raw)),
            Self::Zoom(z) => z.pan(layer, node, point, Some(raw)),
        }
    }

    fn release(&self, layer: &Layer, node: NodeId, point: Point, raw: &RawEvent) {
        match self {
            Self::Drag(d) => d.release(layer, node, point, Some(raw)),
            Self::Zoom(z) => z.release(layer, node, point, Some(raw)),
        }
    }
}

/// What the bubbling lookup found on a node.
enum Found<G> {
    Gesture(G),
    Handler(GestureCallback),
}

/// Routes platform events to node bindings.
///
/// The deepest node under the pointer that carries a binding for the event
/// receives it; bindings bubble up through ancestors. A press landing on a
/// drag or zoom controller captures the pointer so moves and the release reach
/// that controller wherever the pointer goes.
#[derive(Debug, Default)]
pub struct EventRouter {
    capture: Option<(NodeId, Capture)>,
    wheel: Option<(NodeId, Zoom)>,
    hovered: Option<NodeId>,
    last_point: Option<Point>,
}

impl EventRouter {
    /// Router with no capture and no hover.
    pub fn new() -> Self {
        Self::default()
    }

    /// Node whose controller holds the pointer, if any.
    pub fn captured(&self) -> Option<NodeId> {
        self.capture.as_ref().map(|(node, _)| *node)
    }

    /// Node under the pointer as of the last move.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Deliver `raw` to `layer`. Returns the node that handled it.
    ///
    /// Touch events are treated as their pointer equivalents; touch end and
    /// cancel reuse the last known position.
    #[tracing::instrument(skip(self, layer, raw), fields(ty = ?raw.ty))]
    pub fn dispatch(&mut self, layer: &Layer, raw: &RawEvent) -> Option<NodeId> {
        if !layer.settings().enable_events {
            return None;
        }
        let prev = self.last_point;
        let Some(point) = raw.position().or(prev) else {
            tracing::trace!("event without a position dropped");
            return None;
        };
        self.last_point = Some(point);
        let delta = prev.map_or(Vec2::ZERO, |p| point - p);
        let event = GestureEvent {
            x: point.x,
            y: point.y,
            dx: delta.x,
            dy: delta.y,
            transform: GestureTransform::default(),
            raw: Some(raw.clone()),
        };

        match raw.ty.normalized() {
            EventType::PointerDown => self.press(layer, point, raw, &event),
            EventType::PointerMove => {
                if let Some((node, capture)) = &self.capture {
                    capture.move_to(layer, *node, point, raw);
                    return Some(*node);
                }
                self.update_hover(layer, point, &event);
                handle(layer, point, EventType::PointerMove, &event)
            }
            EventType::PointerUp => {
                self.end_wheel(layer, point, raw);
                if let Some((node, capture)) = self.capture.take() {
                    capture.release(layer, node, point, raw);
                    return Some(node);
                }
                handle(layer, point, EventType::PointerUp, &event)
            }
            EventType::PointerLeave => {
                self.end_wheel(layer, point, raw);
                let released = self.capture.take().map(|(node, capture)| {
                    capture.release(layer, node, point, raw);
                    node
                });
                if let Some(old) = self.hovered.take() {
                    fire_own(layer, old, EventType::PointerLeave, &event);
                }
                released
            }
            EventType::Wheel => self.wheel(layer, point, raw, &event),
            other => handle(layer, point, other, &event),
        }
    }

    fn press(
        &mut self,
        layer: &Layer,
        point: Point,
        raw: &RawEvent,
        event: &GestureEvent,
    ) -> Option<NodeId> {
        let (node, binding) = bubble(layer, point, |id| {
            gesture_at(layer, id)
                .map(Found::Gesture)
                .or_else(|| handler_at(layer, id, EventType::PointerDown).map(Found::Handler))
        })?;
        match binding {
            Found::Gesture(capture) => {
                capture.press(layer, node, point, raw);
                tracing::debug!(?node, "pointer captured");
                self.capture = Some((node, capture));
            }
            Found::Handler(cb) => cb(layer, node, event),
        }
        Some(node)
    }

    fn wheel(
        &mut self,
        layer: &Layer,
        point: Point,
        raw: &RawEvent,
        event: &GestureEvent,
    ) -> Option<NodeId> {
        let (node, binding) = bubble(layer, point, |id| match layer.binding(id, EventType::Zoom) {
            Some(EventBinding::Zoom(z)) => Some(Found::Gesture(z)),
            _ => handler_at(layer, id, EventType::Wheel).map(Found::Handler),
        })?;
        match binding {
            Found::Gesture(zoom) => {
                zoom.wheel(layer, node, point, raw.delta_y, Some(raw));
                self.wheel = Some((node, zoom));
            }
            Found::Handler(cb) => cb(layer, node, event),
        }
        Some(node)
    }

    fn end_wheel(&mut self, layer: &Layer, point: Point, raw: &RawEvent) {
        if let Some((node, zoom)) = self.wheel.take() {
            zoom.release(layer, node, point, Some(raw));
        }
    }

    fn update_hover(&mut self, layer: &Layer, point: Point, event: &GestureEvent) {
        let hit = layer.pick(point);
        if hit == self.hovered {
            return;
        }
        if let Some(old) = self.hovered {
            fire_own(layer, old, EventType::PointerLeave, event);
        }
        if let Some(new) = hit {
            fire_own(layer, new, EventType::PointerEnter, event);
        }
        self.hovered = hit;
    }
}

/// Walk from the deepest node under `point` (the root when nothing is hit)
/// up through its ancestors and return the first match.
fn bubble<R>(
    layer: &Layer,
    point: Point,
    mut accept: impl FnMut(NodeId) -> Option<R>,
) -> Option<(NodeId, R)> {
    let start = layer.pick(point).unwrap_or_else(|| layer.root());
    let chain: Vec<NodeId> = layer.with_tree(|t| t.ancestors(start).collect());
    chain.into_iter().find_map(|id| accept(id).map(|r| (id, r)))
}

fn gesture_at(layer: &Layer, node: NodeId) -> Option<Capture> {
    if let Some(EventBinding::Drag(d)) = layer.binding(node, EventType::Drag) {
        return Some(Capture::Drag(d));
    }
    if let Some(EventBinding::Zoom(z)) = layer.binding(node, EventType::Zoom) {
        return Some(Capture::Zoom(z));
    }
    None
}

fn handler_at(layer: &Layer, node: NodeId, ty: EventType) -> Option<GestureCallback> {
    match layer.binding(node, ty) {
        Some(EventBinding::Handler(cb)) => Some(cb),
        _ => None,
    }
}

fn handle(layer: &Layer, point: Point, ty: EventType, event: &GestureEvent) -> Option<NodeId> {
    let (node, cb) = bubble(layer, point, |id| handler_at(layer, id, ty))?;
    cb(layer, node, event);
    Some(node)
}

/// Fire `ty` on `node` only, without bubbling.
fn fire_own(layer: &Layer, node: NodeId, ty: EventType, event: &GestureEvent) {
    if let Some(cb) = handler_at(layer, node, ty) {
        cb(layer, node, event);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/events/router.rs"]
mod tests;
