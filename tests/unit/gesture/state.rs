use super::*;

#[test]
fn compute_keeps_anchor_fixed() {
    let t = GestureTransform::new(Vec2::new(10.0, -4.0), 1.5);
    let anchor = Point::new(40.0, 25.0);
    let before = (t.translate - anchor.to_vec2()) / 1.5;

    let z = t.compute(1.5, 3.0, anchor);
    assert_eq!(z.scale, Vec2::new(3.0, 3.0));
    let after = (z.translate - anchor.to_vec2()) / 3.0;
    assert!((before - after).hypot() < 1e-12);
}

#[test]
fn compute_about_origin_scales_translate() {
    let z = GestureTransform::new(Vec2::new(5.0, 5.0), 1.0).compute(1.0, 2.0, Point::ORIGIN);
    assert_eq!(z.translate, Vec2::new(10.0, 10.0));
}

#[test]
fn pan_accepts_inside_extent() {
    let mut s = TransformState::default();
    s.transform.scale = Vec2::new(2.0, 2.0);
    s.reset_at(Point::new(0.0, 0.0));

    let ext = Extent::new([-10.0, -10.0], [10.0, 10.0]);
    assert!(s.pan_to_pointer(Point::new(6.0, -4.0), ext));
    assert_eq!(s.transform.translate, Vec2::new(6.0, -4.0));
    assert_eq!((s.dx, s.dy), (3.0, -2.0));
}

#[test]
fn pan_drops_outside_extent() {
    let mut s = TransformState::default();
    s.reset_at(Point::new(0.0, 0.0));
    let ext = Extent::new([-10.0, -10.0], [10.0, 10.0]);
    assert!(s.pan_to_pointer(Point::new(4.0, 0.0), ext));
    assert!(!s.pan_to_pointer(Point::new(20.0, 0.0), ext));
    assert_eq!(s.transform.translate, Vec2::new(4.0, 0.0));
    assert_eq!((s.dx, s.dy), (0.0, 0.0));
    assert_eq!((s.x, s.y), (20.0, 0.0));
}

#[test]
fn converts_into_node_transform() {
    let t: Transform = GestureTransform::new(Vec2::new(1.0, 2.0), 3.0).into();
    let p = t.parse();
    assert_eq!((p.translate_x, p.translate_y, p.scale_x, p.scale_y), (1.0, 2.0, 3.0, 3.0));
}
