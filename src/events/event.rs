use std::fmt;
use std::rc::Rc;

use crate::foundation::core::Point;
use crate::gesture::drag::Drag;
use crate::gesture::state::{GestureCallback, GestureTransform};
use crate::gesture::zoom::Zoom;
use crate::scene::layer::Layer;
use crate::scene::tree::NodeId;

/// Event names a node can bind to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    /// Button or first touch pressed.
    PointerDown,
    /// Pointer moved.
    PointerMove,
    /// Button or last touch released.
    PointerUp,
    /// Pointer left the surface.
    PointerLeave,
    /// Hovered node changed to this node.
    PointerEnter,
    /// Click.
    Click,
    /// Wheel scrolled.
    Wheel,
    /// Touch began.
    TouchStart,
    /// Touch moved.
    TouchMove,
    /// Touch ended.
    TouchEnd,
    /// Touch cancelled by the platform.
    TouchCancel,
    /// Slot for a drag controller.
    Drag,
    /// Slot for a zoom controller.
    Zoom,
}

impl EventType {
    /// Pointer equivalent of a touch event; other types map to themselves.
    pub fn normalized(self) -> Self {
        match self {
            Self::TouchStart => Self::PointerDown,
            Self::TouchMove => Self::PointerMove,
            Self::TouchEnd | Self::TouchCancel => Self::PointerUp,
            other => other,
        }
    }

    /// Whether this is a touch event.
    pub fn is_touch(self) -> bool {
        matches!(
            self,
            Self::TouchStart | Self::TouchMove | Self::TouchEnd | Self::TouchCancel
        )
    }
}

/// A platform input event in layer coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct RawEvent {
    /// Event type as delivered.
    pub ty: EventType,
    /// Pointer position; `None` for touch end/cancel.
    pub point: Option<Point>,
    /// Wheel delta.
    pub delta_y: f64,
    /// Active touch points, first touch first.
    pub touches: Vec<Point>,
}

impl RawEvent {
    fn at(ty: EventType, x: f64, y: f64) -> Self {
        Self {
            ty,
            point: Some(Point::new(x, y)),
            delta_y: 0.0,
            touches: Vec::new(),
        }
    }

    /// Pointer press.
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::at(EventType::PointerDown, x, y)
    }

    /// Pointer move.
    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::at(EventType::PointerMove, x, y)
    }

    /// Pointer release.
    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::at(EventType::PointerUp, x, y)
    }

    /// Pointer left the surface.
    pub fn pointer_leave(x: f64, y: f64) -> Self {
        Self::at(EventType::PointerLeave, x, y)
    }

    /// Click.
    pub fn click(x: f64, y: f64) -> Self {
        Self::at(EventType::Click, x, y)
    }

    /// Wheel scroll at `(x, y)`.
    pub fn wheel(x: f64, y: f64, delta_y: f64) -> Self {
        Self {
            delta_y,
            ..Self::at(EventType::Wheel, x, y)
        }
    }

    /// Touch start/move with the current touch points.
    pub fn touch(ty: EventType, touches: Vec<Point>) -> Self {
        Self {
            ty,
            point: None,
            delta_y: 0.0,
            touches,
        }
    }

    /// Touch end or cancel; the position is taken from the last known point.
    pub fn touch_end(ty: EventType) -> Self {
        Self::touch(ty, Vec::new())
    }

    /// Position of the event: the pointer, else the first touch.
    pub fn position(&self) -> Option<Point> {
        self.point.or_else(|| self.touches.first().copied())
    }
}

/// Payload handed to handlers and gesture callbacks.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureEvent {
    /// Pointer x in layer coordinates.
    pub x: f64,
    /// Pointer y in layer coordinates.
    pub y: f64,
    /// Delta x since the previous event.
    pub dx: f64,
    /// Delta y since the previous event.
    pub dy: f64,
    /// Accumulated gesture transform (identity for plain handlers).
    pub transform: GestureTransform,
    /// Originating platform event, absent for scheduler-driven steps.
    pub raw: Option<RawEvent>,
}

/// What a node does with an event type.
#[derive(Clone)]
pub enum EventBinding {
    /// Plain callback.
    Handler(GestureCallback),
    /// Drag controller capturing press/move/release.
    Drag(Drag),
    /// Zoom controller capturing wheel and press/move/release panning.
    Zoom(Zoom),
}

impl EventBinding {
    /// Wrap a closure as a handler binding.
    pub fn handler(f: impl Fn(&Layer, NodeId, &GestureEvent) + 'static) -> Self {
        Self::Handler(Rc::new(f))
    }

    /// Whether this binding is a gesture controller.
    pub fn is_gesture(&self) -> bool {
        !matches!(self, Self::Handler(_))
    }
}

impl fmt::Debug for EventBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(_) => f.write_str("Handler(..)"),
            Self::Drag(d) => f.debug_tuple("Drag").field(d).finish(),
            Self::Zoom(z) => f.debug_tuple("Zoom").field(z).finish(),
        }
    }
}

impl From<Drag> for EventBinding {
    fn from(d: Drag) -> Self {
        Self::Drag(d)
    }
}

impl From<Zoom> for EventBinding {
    fn from(z: Zoom) -> Self {
        Self::Zoom(z)
    }
}
