//! Canopy is a retained-mode 2D scene-graph core.
//!
//! Callers build a tree of shapes on a [`Layer`], mutate attributes, styles
//! and transforms, and let a [`Scheduler`] drive animations and flush dirty
//! layers through a [`Backend`] once per tick:
//!
//! - geometry: transform parsing, per-kind bounding boxes, rotated hit boxes
//!   and hit tests
//! - animation: eased tasks with delay, loops and alternate direction
//! - gestures: drag and zoom/pan controllers, including animated transitions
//! - events: hit-test driven dispatch with pointer capture
//!
//! Concrete drawing surfaces live outside the crate; [`HeadlessBackend`]
//! records calls for tests and headless use.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Easing, interpolation and the task scheduler.
pub mod animation;
/// Backend boundary and the headless recorder.
pub mod backend;
/// Input events and dispatch.
pub mod events;
/// Shared primitives, errors and settings.
pub mod foundation;
/// Pure geometry.
pub mod geometry;
/// Drag and zoom controllers.
pub mod gesture;
/// Nodes and layers.
pub mod scene;

pub use crate::animation::{
    AnimationTask, Direction, Ease, LoopCount, RenderRoot, RootIndex, Scheduler, SchedulerHandle,
    TaskId, TaskTarget,
};
pub use crate::backend::{Backend, BackendHandle, HeadlessBackend, TextureCache};
pub use crate::events::{EventBinding, EventRouter, EventType, GestureEvent, RawEvent};
pub use crate::foundation::config::{CanopyConfig, DragConfig, LayerSettings, ZoomConfig};
pub use crate::foundation::core::{Affine, BBox, BezPath, Extent, Point, Rect, Vec2};
pub use crate::foundation::error::{CanopyError, CanopyResult};
pub use crate::geometry::{Rotate, Scale, Transform};
pub use crate::gesture::{Drag, GestureTransform, TransformState, Zoom};
pub use crate::scene::{
    AnimateSpec, AttrValue, Attrs, Color, ElementConfig, Layer, NodeId, ShapeKind, StyleValue,
    Styles,
};
