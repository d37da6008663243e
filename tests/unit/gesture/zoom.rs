use super::*;
use std::cell::Cell;

use crate::animation::queue::Scheduler;
use crate::backend::HeadlessBackend;
use crate::foundation::config::LayerSettings;
use crate::foundation::core::Vec2;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn layer() -> (Scheduler, Layer) {
    let s = Scheduler::new();
    let layer = Layer::new(&s.handle(), HeadlessBackend::new(), LayerSettings::default());
    (s, layer)
}

fn counter() -> (Rc<Cell<usize>>, impl Fn(&Layer, NodeId, &GestureEvent) + 'static) {
    let n = Rc::new(Cell::new(0));
    let c = Rc::clone(&n);
    (n, move |_: &Layer, _: NodeId, _: &GestureEvent| c.set(c.get() + 1))
}

fn close(a: Vec2, b: Vec2) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn wheel_zooms_about_the_cursor() {
    let (_s, layer) = layer();
    let node = layer.root();
    let (starts, on_start) = counter();
    let (zooms, on_zoom) = counter();
    let zoom = Zoom::default().on_start(on_start).on_zoom(on_zoom);

    let anchor = Point::new(100.0, 100.0);
    zoom.wheel(&layer, node, anchor, -1000.0, None);
    let t = zoom.state().transform;
    assert!((t.scale.x - 2.0).abs() < 1e-12);
    assert!(close(t.translate, Vec2::new(-100.0, -100.0)));
    assert_eq!(zoom.phase(), ZoomPhase::Zooming);

    zoom.wheel(&layer, node, anchor, 500.0, None);
    assert_eq!(starts.get(), 1);
    assert_eq!(zooms.get(), 2);
    let t = zoom.state().transform;
    assert!((t.scale.x - 1.5).abs() < 1e-12);
    // The layer point under the cursor is unchanged.
    assert!(close((t.translate - anchor.to_vec2()) / t.scale.x, -anchor.to_vec2()));
}

#[test]
fn wheel_scale_is_clamped() {
    let (_s, layer) = layer();
    let node = layer.root();
    let zoom = Zoom::default();
    zoom.set_scale_extent([0.5, 4.0]);

    zoom.wheel(&layer, node, Point::ORIGIN, -1.0e6, None);
    assert_eq!(zoom.state().transform.scale, Vec2::new(4.0, 4.0));
    zoom.wheel(&layer, node, Point::ORIGIN, 1.0e6, None);
    assert_eq!(zoom.state().transform.scale, Vec2::new(0.5, 0.5));
}

#[test]
fn release_ends_zooming_once() {
    let (_s, layer) = layer();
    let node = layer.root();
    let (ends, on_end) = counter();
    let zoom = Zoom::default().on_end(on_end);

    zoom.wheel(&layer, node, Point::ORIGIN, -10.0, None);
    zoom.release(&layer, node, Point::ORIGIN, None);
    zoom.release(&layer, node, Point::ORIGIN, None);
    assert_eq!(ends.get(), 1);
    assert_eq!(zoom.phase(), ZoomPhase::Idle);
}

#[test]
fn pointer_pan_respects_pan_extent() {
    let (_s, layer) = layer();
    let node = layer.root();
    let zoom = Zoom::new(&ZoomConfig {
        pan_extent: Extent::new([-5.0, -5.0], [5.0, 5.0]),
        ..ZoomConfig::default()
    });

    zoom.pan(&layer, node, Point::new(3.0, 3.0), None);
    assert_eq!(zoom.state().transform.translate, Vec2::ZERO);

    zoom.press(&layer, node, Point::new(0.0, 0.0), None);
    zoom.pan(&layer, node, Point::new(3.0, 4.0), None);
    zoom.pan(&layer, node, Point::new(9.0, 4.0), None);
    assert_eq!(zoom.state().transform.translate, Vec2::new(3.0, 4.0));
}

#[test]
fn scale_to_lands_exactly_and_ends_once() {
    let (mut s, layer) = layer();
    let node = layer.root();
    let (starts, on_start) = counter();
    let (ends, on_end) = counter();
    let zoom = Zoom::default().on_start(on_start).on_end(on_end);

    zoom.scale_to(&layer, node, 2.0, Point::ORIGIN);
    s.tick(ms(0));
    s.tick(ms(100));
    assert_eq!(zoom.phase(), ZoomPhase::Zooming);
    s.tick(ms(250));
    s.tick(ms(300));

    let t = zoom.state().transform;
    assert_eq!(t.scale, Vec2::new(2.0, 2.0));
    assert_eq!(t.translate, Vec2::ZERO);
    assert_eq!(starts.get(), 1);
    assert_eq!(ends.get(), 1);
    assert_eq!(zoom.phase(), ZoomPhase::Idle);
    assert_eq!(s.active_count(), 0);
}

#[test]
fn scale_by_then_inverse_restores_state() {
    let (mut s, layer) = layer();
    let node = layer.root();
    let zoom = Zoom::default();
    zoom.set_transform(GestureTransform::new(Vec2::new(12.0, -7.0), 1.0));
    let anchor = Point::new(30.0, 40.0);

    zoom.scale_by(&layer, node, 3.0, anchor);
    for t in [0, 80, 160, 250] {
        s.tick(ms(t));
    }
    assert!((zoom.state().transform.scale.x - 3.0).abs() < 1e-12);

    zoom.scale_by(&layer, node, 1.0 / 3.0, anchor);
    for t in [1000, 1070, 1190, 1250] {
        s.tick(ms(t));
    }
    let t = zoom.state().transform;
    assert!((t.scale.x - 1.0).abs() < 1e-12);
    assert!(close(t.translate, Vec2::new(12.0, -7.0)));
}

#[test]
fn pan_to_moves_the_last_pointer_to_the_target() {
    let (mut s, layer) = layer();
    let node = layer.root();
    let zoom = Zoom::default();

    zoom.pan_to(&layer, node, Point::new(10.0, 20.0));
    s.tick(ms(0));
    s.tick(ms(250));
    assert_eq!(zoom.state().transform.translate, Vec2::new(10.0, 20.0));
    assert_eq!(zoom.phase(), ZoomPhase::Idle);
}

#[test]
fn new_transition_replaces_the_one_in_flight() {
    let (mut s, layer) = layer();
    let node = layer.root();
    let (ends, on_end) = counter();
    let zoom = Zoom::default().on_end(on_end);

    zoom.scale_to(&layer, node, 4.0, Point::ORIGIN);
    s.tick(ms(0));
    zoom.scale_to(&layer, node, 2.0, Point::ORIGIN);
    s.tick(ms(10));
    assert_eq!(s.active_count(), 1);
    s.tick(ms(260));

    assert_eq!(zoom.state().transform.scale, Vec2::new(2.0, 2.0));
    assert_eq!(ends.get(), 1);
}

#[test]
fn interrupt_stops_without_rolling_back() {
    let (mut s, layer) = layer();
    let node = layer.root();
    let zoom = Zoom::default();

    zoom.scale_to(&layer, node, 3.0, Point::ORIGIN);
    s.tick(ms(0));
    s.tick(ms(125));
    zoom.interrupt(&layer);
    s.tick(ms(200));

    assert_eq!(s.active_count(), 0);
    assert!((zoom.state().transform.scale.x - 2.0).abs() < 1e-12);
    assert_eq!(zoom.phase(), ZoomPhase::Zooming);
}

#[test]
fn zero_scale_collapses_onto_the_anchor() {
    let (mut s, layer) = layer();
    let node = layer.root();
    let zoom = Zoom::default();

    zoom.scale_to(&layer, node, 0.0, Point::new(10.0, 20.0));
    for t in [0, 100, 250, 300] {
        s.tick(ms(t));
    }
    let t = zoom.state().transform;
    assert_eq!(t.scale, Vec2::ZERO);
    assert_eq!(t.translate, Vec2::new(10.0, 20.0));

    zoom.zoom_target(Some(Point::new(50.0, 50.0)));
    zoom.scale_to(&layer, node, 0.0, Point::new(10.0, 20.0));
    zoom.pan_to(&layer, node, Point::new(40.0, 40.0));
    for t in [400, 500, 650, 700] {
        s.tick(ms(t));
    }
    let t = zoom.state().transform;
    assert!(t.translate.x.is_finite() && t.translate.y.is_finite());
}
