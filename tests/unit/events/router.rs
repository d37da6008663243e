use super::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::queue::Scheduler;
use crate::backend::HeadlessBackend;
use crate::foundation::config::{DragConfig, LayerSettings};
use crate::gesture::drag::DragPhase;
use crate::gesture::zoom::ZoomPhase;
use crate::scene::layer::ElementConfig;

fn setup() -> (Scheduler, Layer, NodeId, NodeId) {
    let s = Scheduler::new();
    let layer = Layer::new(&s.handle(), HeadlessBackend::new(), LayerSettings::default());
    let group = layer
        .create_el(layer.root(), ElementConfig::new("group"))
        .unwrap()
        .unwrap();
    let rect = layer
        .create_el(
            group,
            ElementConfig::new("rect")
                .with_attr("width", 10.0)
                .with_attr("height", 10.0),
        )
        .unwrap()
        .unwrap();
    layer.execute().unwrap();
    (s, layer, group, rect)
}

type Log = Rc<RefCell<Vec<(NodeId, f64, f64)>>>;

fn logger(log: &Log) -> EventBinding {
    let log = Rc::clone(log);
    EventBinding::handler(move |_, node, e| log.borrow_mut().push((node, e.x, e.y)))
}

#[test]
fn handlers_bubble_to_the_nearest_binding() {
    let (_s, layer, group, _rect) = setup();
    let log = Log::default();
    layer.on(group, EventType::Click, logger(&log)).unwrap();

    let mut router = EventRouter::new();
    assert_eq!(router.dispatch(&layer, &RawEvent::click(5.0, 5.0)), Some(group));
    assert_eq!(*log.borrow(), vec![(group, 5.0, 5.0)]);
    assert_eq!(router.dispatch(&layer, &RawEvent::pointer_up(5.0, 5.0)), None);
}

#[test]
fn disabled_layers_receive_nothing() {
    let (_s, layer, group, _rect) = setup();
    let log = Log::default();
    layer.on(group, EventType::Click, logger(&log)).unwrap();
    layer.set_enable_events(false);

    let mut router = EventRouter::new();
    assert_eq!(router.dispatch(&layer, &RawEvent::click(5.0, 5.0)), None);
    assert!(log.borrow().is_empty());
}

#[test]
fn drag_captures_until_release() {
    let (_s, layer, _group, rect) = setup();
    let drag = Drag::new(&DragConfig::default());
    layer.on(rect, EventType::Drag, drag.clone()).unwrap();

    let mut router = EventRouter::new();
    assert_eq!(router.dispatch(&layer, &RawEvent::pointer_down(5.0, 5.0)), Some(rect));
    assert_eq!(router.captured(), Some(rect));
    assert_eq!(drag.phase(), DragPhase::Dragging);

    assert_eq!(router.dispatch(&layer, &RawEvent::pointer_move(50.0, 45.0)), Some(rect));
    assert_eq!(drag.state().transform.translate, Vec2::new(45.0, 40.0));

    assert_eq!(router.dispatch(&layer, &RawEvent::pointer_up(50.0, 45.0)), Some(rect));
    assert_eq!(router.captured(), None);
    assert_eq!(drag.phase(), DragPhase::Idle);
}

#[test]
fn leaving_the_surface_releases_the_capture() {
    let (_s, layer, _group, rect) = setup();
    let drag = Drag::default();
    layer.on(rect, EventType::Drag, drag.clone()).unwrap();

    let mut router = EventRouter::new();
    router.dispatch(&layer, &RawEvent::pointer_down(5.0, 5.0));
    assert_eq!(router.dispatch(&layer, &RawEvent::pointer_leave(-1.0, 5.0)), Some(rect));
    assert_eq!(drag.phase(), DragPhase::Idle);
}

#[test]
fn wheel_reaches_an_ancestor_zoom_until_pointer_up() {
    let (_s, layer, _group, _rect) = setup();
    let root = layer.root();
    let zoom = Zoom::default();
    layer.on(root, EventType::Zoom, zoom.clone()).unwrap();

    let mut router = EventRouter::new();
    assert_eq!(router.dispatch(&layer, &RawEvent::wheel(5.0, 5.0, -100.0)), Some(root));
    assert!((zoom.state().transform.scale.x - 1.1).abs() < 1e-12);
    assert_eq!(zoom.phase(), ZoomPhase::Zooming);

    router.dispatch(&layer, &RawEvent::pointer_up(5.0, 5.0));
    assert_eq!(zoom.phase(), ZoomPhase::Idle);
}

#[test]
fn touch_end_reuses_the_last_point() {
    let (_s, layer, _group, rect) = setup();
    let drag = Drag::default();
    layer.on(rect, EventType::Drag, drag.clone()).unwrap();

    let mut router = EventRouter::new();
    let start = RawEvent::touch(EventType::TouchStart, vec![Point::new(2.0, 2.0)]);
    assert_eq!(router.dispatch(&layer, &start), Some(rect));
    let moved = RawEvent::touch(EventType::TouchMove, vec![Point::new(4.0, 3.0)]);
    router.dispatch(&layer, &moved);
    router.dispatch(&layer, &RawEvent::touch_end(EventType::TouchEnd));

    let state = drag.state();
    assert_eq!(drag.phase(), DragPhase::Idle);
    assert_eq!((state.x, state.y), (4.0, 3.0));
    assert_eq!(state.transform.translate, Vec2::new(2.0, 1.0));
}

#[test]
fn hover_fires_enter_and_leave() {
    let (_s, layer, _group, rect) = setup();
    let entered = Log::default();
    let left = Log::default();
    layer.on(rect, EventType::PointerEnter, logger(&entered)).unwrap();
    layer.on(rect, EventType::PointerLeave, logger(&left)).unwrap();

    let mut router = EventRouter::new();
    router.dispatch(&layer, &RawEvent::pointer_move(3.0, 3.0));
    assert_eq!(router.hovered(), Some(rect));
    router.dispatch(&layer, &RawEvent::pointer_move(4.0, 3.0));
    router.dispatch(&layer, &RawEvent::pointer_move(30.0, 30.0));

    assert_eq!(router.hovered(), None);
    assert_eq!(*entered.borrow(), vec![(rect, 3.0, 3.0)]);
    assert_eq!(*left.borrow(), vec![(rect, 30.0, 30.0)]);
}

#[test]
fn handler_may_mutate_the_layer() {
    let (_s, layer, _group, rect) = setup();
    layer
        .on(
            rect,
            EventType::Click,
            EventBinding::handler(|layer, node, _| {
                layer.set_attr(node, "clicked", true).unwrap();
            }),
        )
        .unwrap();

    let mut router = EventRouter::new();
    router.dispatch(&layer, &RawEvent::click(1.0, 1.0));
    assert_eq!(
        layer.get_attr(rect, "clicked").unwrap(),
        Some(crate::scene::attr::AttrValue::Bool(true))
    );
}

#[test]
fn touch_end_without_history_is_dropped() {
    let (_s, layer, _group, _rect) = setup();
    let mut router = EventRouter::new();
    assert_eq!(router.dispatch(&layer, &RawEvent::touch_end(EventType::TouchCancel)), None);
}
