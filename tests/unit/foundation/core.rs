use super::*;

#[test]
fn enclosing_handles_empty_and_scattered_points() {
    assert_eq!(BBox::enclosing(std::iter::empty()), None);

    let b = BBox::enclosing([
        Point::new(3.0, -1.0),
        Point::new(-2.0, 4.0),
        Point::new(1.0, 1.0),
    ])
    .unwrap();
    assert_eq!(b, BBox::new(-2.0, -1.0, 5.0, 5.0));
}

#[test]
fn to_rect_normalizes_negative_extent() {
    let b = BBox::new(10.0, 10.0, -4.0, -2.0);
    let r = b.to_rect();
    assert_eq!((r.x0, r.y0, r.x1, r.y1), (6.0, 8.0, 10.0, 10.0));
    assert!(b.contains(Point::new(7.0, 9.0)));
    assert_eq!(BBox::from_rect(r), BBox::new(6.0, 8.0, 4.0, 2.0));
}

#[test]
fn extent_bounds_scale_with_current_scale() {
    let ext = Extent::new([-10.0, -10.0], [10.0, 10.0]);
    assert!(ext.contains_scaled(Vec2::new(15.0, 0.0), 2.0, 2.0));
    assert!(!ext.contains_scaled(Vec2::new(15.0, 0.0), 1.0, 1.0));
    assert!(Extent::UNBOUNDED.contains_scaled(Vec2::new(1e12, -1e12), 1.0, 1.0));
    assert!(Extent::UNBOUNDED.contains_scaled(Vec2::new(3.0, 4.0), 0.0, 0.0));
}

#[test]
fn extent_serializes_infinite_bounds_as_null() {
    let ext = Extent::new([-5.0, f64::NEG_INFINITY], [5.0, f64::INFINITY]);
    let v = serde_json::to_value(ext).unwrap();
    assert_eq!(v, serde_json::json!([[-5.0, null], [5.0, null]]));
    let back: Extent = serde_json::from_value(v).unwrap();
    assert_eq!(back, ext);
}
