//! Easing curves, interpolation and the frame-driven task scheduler.

/// Named easing curves.
pub mod ease;
/// Linear interpolation of animatable values.
pub mod lerp;
/// Scheduler and render-root registry.
pub mod queue;
/// Task definition and per-tick progress.
pub mod task;

pub use ease::Ease;
pub use lerp::{Lerp, lerp_to};
pub use queue::{RenderRoot, Scheduler, SchedulerHandle};
pub use task::{AnimationTask, Direction, GestureId, LoopCount, RootIndex, Step, TaskId, TaskTarget};
