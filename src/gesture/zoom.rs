use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::animation::ease::Ease;
use crate::animation::lerp::lerp_to;
use crate::animation::task::{AnimationTask, GestureId, TaskId, TaskTarget};
use crate::events::event::{GestureEvent, RawEvent};
use crate::foundation::config::ZoomConfig;
use crate::foundation::core::{Extent, Point};
use crate::gesture::state::{GestureCallback, GestureTransform, TransformState, fire, unscale};
use crate::scene::layer::Layer;
use crate::scene::tree::NodeId;

/// Zoom controller phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZoomPhase {
    /// No zoom or pan in progress.
    #[default]
    Idle,
    /// Between zoom start and zoom end.
    Zooming,
}

struct ZoomInner {
    id: Option<GestureId>,
    phase: ZoomPhase,
    state: TransformState,
    zoom_factor: f64,
    scale_extent: [f64; 2],
    pan_extent: Extent,
    duration: Duration,
    ease: Ease,
    zoom_target: Option<Point>,
    on_start: Option<GestureCallback>,
    on_zoom: Option<GestureCallback>,
    on_end: Option<GestureCallback>,
}

impl ZoomInner {
    fn clamp_scale(&self, s: f64) -> f64 {
        let [min, max] = self.scale_extent;
        if s <= min {
            min
        } else if s >= max {
            max
        } else {
            s
        }
    }

    /// Enter zooming; returns the start callback and event when this was a transition.
    fn begin(
        &mut self,
        point: Point,
        raw: Option<&RawEvent>,
    ) -> Option<(Option<GestureCallback>, GestureEvent)> {
        if self.phase == ZoomPhase::Zooming {
            return None;
        }
        self.phase = ZoomPhase::Zooming;
        self.state.reset_at(point);
        Some((self.on_start.clone(), self.state.to_event(raw)))
    }

    fn finish(&mut self, raw: Option<&RawEvent>) -> (Option<GestureCallback>, GestureEvent) {
        self.phase = ZoomPhase::Idle;
        self.state.dx = 0.0;
        self.state.dy = 0.0;
        (self.on_end.clone(), self.state.to_event(raw))
    }
}

/// Wheel zoom, pointer pan and animated scale/pan transitions.
///
/// Scale is uniform. Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct Zoom {
    inner: Rc<RefCell<ZoomInner>>,
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new(&ZoomConfig::default())
    }
}

impl std::fmt::Debug for Zoom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Zoom")
            .field("phase", &inner.phase)
            .field("state", &inner.state)
            .field("zoom_factor", &inner.zoom_factor)
            .field("scale_extent", &inner.scale_extent)
            .finish_non_exhaustive()
    }
}

impl Zoom {
    /// Controller configured from `config`.
    pub fn new(config: &ZoomConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ZoomInner {
                id: None,
                phase: ZoomPhase::Idle,
                state: TransformState::default(),
                zoom_factor: config.zoom_factor,
                scale_extent: config.scale_extent,
                pan_extent: config.pan_extent,
                duration: Duration::from_millis(config.duration_ms),
                ease: Ease::from_name(&config.ease),
                zoom_target: None,
                on_start: None,
                on_zoom: None,
                on_end: None,
            })),
        }
    }

    /// Fired when zooming or panning starts.
    pub fn on_start(self, f: impl Fn(&Layer, NodeId, &GestureEvent) + 'static) -> Self {
        self.inner.borrow_mut().on_start = Some(Rc::new(f));
        self
    }

    /// Fired on every zoom or pan step.
    pub fn on_zoom(self, f: impl Fn(&Layer, NodeId, &GestureEvent) + 'static) -> Self {
        self.inner.borrow_mut().on_zoom = Some(Rc::new(f));
        self
    }

    /// Fired when zooming or panning ends.
    pub fn on_end(self, f: impl Fn(&Layer, NodeId, &GestureEvent) + 'static) -> Self {
        self.inner.borrow_mut().on_end = Some(Rc::new(f));
        self
    }

    /// Scale change per wheel delta unit.
    pub fn set_zoom_factor(&self, factor: f64) {
        self.inner.borrow_mut().zoom_factor = factor;
    }

    /// `[min, max]` scale clamp.
    pub fn set_scale_extent(&self, extent: [f64; 2]) {
        self.inner.borrow_mut().scale_extent = extent;
    }

    /// Translate bounds for pointer panning.
    pub fn set_pan_extent(&self, extent: Extent) {
        self.inner.borrow_mut().pan_extent = extent;
    }

    /// Length of animated transitions.
    pub fn set_duration(&self, duration: Duration) {
        self.inner.borrow_mut().duration = duration;
    }

    /// Curve of animated transitions.
    pub fn set_ease(&self, ease: Ease) {
        self.inner.borrow_mut().ease = ease;
    }

    /// Point that animated scales drift toward; `None` keeps the anchor fixed.
    pub fn zoom_target(&self, point: Option<Point>) {
        self.inner.borrow_mut().zoom_target = point;
    }

    /// Seed the accumulated transform.
    pub fn set_transform(&self, transform: GestureTransform) {
        self.inner.borrow_mut().state.transform = transform;
    }

    /// Current phase.
    pub fn phase(&self) -> ZoomPhase {
        self.inner.borrow().phase
    }

    /// Snapshot of the live state.
    pub fn state(&self) -> TransformState {
        self.inner.borrow().state
    }

    /// Wheel step: enter zooming if idle, then rescale about `point` by
    /// `-delta_y * zoom_factor`, clamped to the scale extent.
    pub fn wheel(
        &self,
        layer: &Layer,
        node: NodeId,
        point: Point,
        delta_y: f64,
        raw: Option<&RawEvent>,
    ) {
        let (start, cb, event) = {
            let mut inner = self.inner.borrow_mut();
            let start = inner.begin(point, raw);
            let old = inner.state.transform.scale.x;
            let new = inner.clamp_scale(old + delta_y * -1.0 * inner.zoom_factor);
            inner.state.transform = inner.state.transform.compute(old, new, point);
            inner.state.x = point.x;
            inner.state.y = point.y;
            (start, inner.on_zoom.clone(), inner.state.to_event(raw))
        };
        if let Some((start_cb, start_event)) = start {
            fire(start_cb, layer, node, &start_event);
        }
        fire(cb, layer, node, &event);
    }

    /// Pan press: enter zooming if idle.
    pub fn press(&self, layer: &Layer, node: NodeId, point: Point, raw: Option<&RawEvent>) {
        let start = self.inner.borrow_mut().begin(point, raw);
        if let Some((cb, event)) = start {
            fire(cb, layer, node, &event);
        }
    }

    /// Pan move: translate by the pointer delta when inside the pan extent.
    /// Ignored while idle.
    pub fn pan(&self, layer: &Layer, node: NodeId, point: Point, raw: Option<&RawEvent>) {
        let (cb, event) = {
            let mut inner = self.inner.borrow_mut();
            if inner.phase == ZoomPhase::Idle {
                return;
            }
            let extent = inner.pan_extent;
            inner.state.pan_to_pointer(point, extent);
            (inner.on_zoom.clone(), inner.state.to_event(raw))
        };
        fire(cb, layer, node, &event);
    }

    /// Release or leave: zooming -> idle. Ignored while idle.
    pub fn release(&self, layer: &Layer, node: NodeId, point: Point, raw: Option<&RawEvent>) {
        let (cb, event) = {
            let mut inner = self.inner.borrow_mut();
            if inner.phase == ZoomPhase::Idle {
                return;
            }
            inner.state.x = point.x;
            inner.state.y = point.y;
            inner.finish(raw)
        };
        fire(cb, layer, node, &event);
    }

    /// Animate to absolute scale `k` about `anchor`.
    pub fn scale_to(&self, layer: &Layer, node: NodeId, k: f64, anchor: Point) -> TaskId {
        self.schedule_scale(layer, node, |_| k, anchor)
    }

    /// Animate to the current scale times `k` about `anchor`.
    pub fn scale_by(&self, layer: &Layer, node: NodeId, k: f64, anchor: Point) -> TaskId {
        self.schedule_scale(layer, node, |orig| orig * k, anchor)
    }

    fn schedule_scale(
        &self,
        layer: &Layer,
        node: NodeId,
        target: impl FnOnce(f64) -> f64,
        anchor: Point,
    ) -> TaskId {
        let (orig, diff) = {
            let inner = self.inner.borrow();
            let orig = inner.state.transform.scale.x;
            let zt = inner.zoom_target.unwrap_or(anchor);
            (orig, (zt - anchor) * orig)
        };
        let new = target(orig);
        let mut pf = 0.0;
        self.schedule(layer, node, move |inner, f| {
            let old = inner.state.transform.scale.x;
            let n = inner.clamp_scale(lerp_to(&orig, &new, f));
            let mut t = inner.state.transform.compute(old, n, anchor);
            t.translate += unscale(diff * (f - pf), n);
            inner.state.transform = t;
            pf = f;
        }, anchor)
    }

    /// Animate a pan so the last pointer position moves to `point`.
    pub fn pan_to(&self, layer: &Layer, node: NodeId, point: Point) -> TaskId {
        let (diff, from) = {
            let inner = self.inner.borrow();
            let from = Point::new(inner.state.x, inner.state.y);
            (point - from, from)
        };
        let mut pf = 0.0;
        self.schedule(layer, node, move |inner, f| {
            let scale = inner.state.transform.scale.x;
            inner.state.transform.translate += unscale(diff * (f - pf), scale);
            pf = f;
        }, from)
    }

    /// Queue a transition task on this controller's target. Any transition
    /// already in flight is cancelled first.
    fn schedule(
        &self,
        layer: &Layer,
        node: NodeId,
        mut step: impl FnMut(&mut ZoomInner, f64) + 'static,
        start_point: Point,
    ) -> TaskId {
        let scheduler = layer.scheduler();
        let (target, duration, ease) = {
            let mut inner = self.inner.borrow_mut();
            let id = *inner.id.get_or_insert_with(|| scheduler.allocate_gesture_id());
            (TaskTarget::Gesture(id), inner.duration, inner.ease)
        };
        scheduler.cancel_target(target);

        let run_zoom = self.clone();
        let run_layer = layer.downgrade();
        let end_zoom = self.clone();
        let end_layer = layer.downgrade();
        let task = AnimationTask::new(move |f| {
            let Some(layer) = run_layer.upgrade() else {
                return;
            };
            let (start, cb, event) = {
                let mut inner = run_zoom.inner.borrow_mut();
                let start = inner.begin(start_point, None);
                step(&mut *inner, f);
                (start, inner.on_zoom.clone(), inner.state.to_event(None))
            };
            if let Some((start_cb, start_event)) = start {
                fire(start_cb, &layer, node, &start_event);
            }
            fire(cb, &layer, node, &event);
        })
        .target(target)
        .duration(duration)
        .ease(ease)
        .on_end(move || {
            let Some(layer) = end_layer.upgrade() else {
                return;
            };
            let (cb, event) = end_zoom.inner.borrow_mut().finish(None);
            fire(cb, &layer, node, &event);
        });
        scheduler.add_task(task)
    }

    /// Cancel any transition in flight. The phase is left as is.
    pub fn interrupt(&self, layer: &Layer) {
        if let Some(id) = self.inner.borrow().id {
            layer.scheduler().cancel_target(TaskTarget::Gesture(id));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gesture/zoom.rs"]
mod tests;
