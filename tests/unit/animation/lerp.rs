use super::*;
use crate::foundation::core::Point;

#[test]
fn lerp_to_lands_exactly_on_target() {
    let a = 0.1;
    let b = 0.7;
    assert_eq!(lerp_to(&a, &b, 1.0), 0.7);
    assert_eq!(lerp_to(&a, &b, 0.0), 0.1);
    assert_eq!(lerp_to(&0.0, &4.0, 0.5), 2.0);
}

#[test]
fn lerp_to_extrapolates_overshoot() {
    assert_eq!(lerp_to(&0.0, &100.0, 1.25), 125.0);
    assert_eq!(lerp_to(&10.0, &20.0, -0.5), 5.0);
    let t = lerp_to(&Transform::IDENTITY, &Transform::translate(8.0, 0.0), 1.5);
    assert_eq!(t.translate, Some([12.0, 0.0]));
}

#[test]
fn transform_interpolates_from_identity() {
    let to = Transform::translate(10.0, 20.0).with_scale(3.0).with_rotate_about(90.0, 1.0, 1.0);
    let mid = Transform::lerp(&Transform::IDENTITY, &to, 0.5);
    assert_eq!(mid.translate, Some([5.0, 10.0]));
    assert_eq!(mid.scale, Some(Scale::Uniform(2.0)));
    let r = mid.rotate.unwrap();
    assert_eq!(r.angle, 45.0);
    assert_eq!(r.pivot, Some(Point::new(1.0, 1.0)));

    let none = Transform::lerp(&Transform::IDENTITY, &Transform::IDENTITY, 0.3);
    assert_eq!(none, Transform::IDENTITY);
}

#[test]
fn transform_keeps_axes_when_they_differ() {
    let from = Transform::IDENTITY.with_scale_xy(1.0, 2.0);
    let to = Transform::IDENTITY.with_scale(3.0);
    let mid = Transform::lerp(&from, &to, 0.5);
    assert_eq!(mid.scale, Some(Scale::Axes(2.0, 2.5)));
}
