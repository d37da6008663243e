use super::*;
use std::cell::Cell;

use crate::animation::queue::Scheduler;
use crate::backend::HeadlessBackend;
use crate::foundation::config::LayerSettings;
use crate::foundation::core::Vec2;

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

#[test]
fn press_move_release_cycle() {
    let (_s, layer) = layer();
    let node = layer.root();
    let (starts, on_start) = counter();
    let (ends, on_end) = counter();
    let moves = Rc::new(RefCell::new(Vec::new()));
    let m = Rc::clone(&moves);
    let drag = Drag::new(&DragConfig::default())
        .on_start(on_start)
        .on_drag(move |_, _, e| m.borrow_mut().push((e.dx, e.dy)))
        .on_end(on_end);

    drag.press(&layer, node, Point::new(10.0, 10.0), None);
    assert_eq!(drag.phase(), DragPhase::Dragging);
    drag.drag_to(&layer, node, Point::new(15.0, 13.0), None);
    drag.drag_to(&layer, node, Point::new(16.0, 13.0), None);
    drag.release(&layer, node, Point::new(16.0, 13.0), None);

    assert_eq!(starts.get(), 1);
    assert_eq!(ends.get(), 1);
    assert_eq!(*moves.borrow(), vec![(5.0, 3.0), (1.0, 0.0)]);
    assert_eq!(drag.phase(), DragPhase::Idle);
    let state = drag.state();
    assert_eq!(state.transform.translate, Vec2::new(6.0, 3.0));
    assert_eq!((state.dx, state.dy), (0.0, 0.0));
}

#[test]
fn out_of_extent_delta_is_dropped() {
    let (_s, layer) = layer();
    let node = layer.root();
    let drag = Drag::new(&DragConfig {
        extent: Extent::new([-10.0, -10.0], [10.0, 10.0]),
    });

    drag.press(&layer, node, Point::new(0.0, 0.0), None);
    drag.drag_to(&layer, node, Point::new(8.0, 0.0), None);
    drag.drag_to(&layer, node, Point::new(20.0, 0.0), None);

    let state = drag.state();
    assert_eq!(state.transform.translate, Vec2::new(8.0, 0.0));
    assert_eq!((state.dx, state.dy), (0.0, 0.0));
    assert_eq!((state.x, state.y), (20.0, 0.0));
}

#[test]
fn deltas_are_reported_in_unscaled_units() {
    let (_s, layer) = layer();
    let node = layer.root();
    let drag = Drag::default();
    drag.set_transform(GestureTransform::new(Vec2::ZERO, 2.0));

    drag.press(&layer, node, Point::new(0.0, 0.0), None);
    drag.drag_to(&layer, node, Point::new(4.0, -6.0), None);

    let state = drag.state();
    assert_eq!((state.dx, state.dy), (2.0, -3.0));
    assert_eq!(state.transform.translate, Vec2::new(4.0, -6.0));
}

#[test]
fn idle_moves_and_releases_are_ignored() {
    let (_s, layer) = layer();
    let node = layer.root();
    let (ends, on_end) = counter();
    let drag = Drag::default().on_end(on_end);

    drag.drag_to(&layer, node, Point::new(5.0, 5.0), None);
    drag.release(&layer, node, Point::new(5.0, 5.0), None);

    assert_eq!(ends.get(), 0);
    assert_eq!(drag.state().transform, GestureTransform::default());
}

#[test]
fn second_press_while_dragging_is_ignored() {
    let (_s, layer) = layer();
    let node = layer.root();
    let (starts, on_start) = counter();
    let drag = Drag::default().on_start(on_start);

    drag.press(&layer, node, Point::new(0.0, 0.0), None);
    drag.press(&layer, node, Point::new(3.0, 3.0), None);
    assert_eq!(starts.get(), 1);
    assert_eq!(drag.state().x, 0.0);
}

#[test]
fn zero_scale_reports_no_delta() {
    let (_s, layer) = layer();
    let node = layer.root();
    let drag = Drag::default();
    drag.set_transform(GestureTransform::new(Vec2::ZERO, 0.0));

    drag.press(&layer, node, Point::new(0.0, 0.0), None);
    drag.drag_to(&layer, node, Point::new(4.0, -6.0), None);

    let state = drag.state();
    assert_eq!((state.dx, state.dy), (0.0, 0.0));
    assert_eq!(state.transform.translate, Vec2::new(4.0, -6.0));
}
