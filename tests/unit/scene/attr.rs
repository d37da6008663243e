use super::*;
use serde_json::json;

#[test]
fn kind_names_round_trip_through_from_str() {
    for kind in ShapeKind::ALL {
        assert_eq!(kind.name().parse::<ShapeKind>().unwrap(), kind);
    }
    assert!("hexagon".parse::<ShapeKind>().is_err());
    assert!(ShapeKind::Group.is_group());
    assert!(!ShapeKind::Rect.is_group());
}

#[test]
fn merge_inserts_overwrites_and_deletes() {
    let mut attrs = Attrs::new().with("x", 1.0).with("label", "a");
    assert!(!attrs.merge("x", AttrValue::Number(1.0)));
    assert!(attrs.merge("x", AttrValue::Number(2.0)));
    assert_eq!(attrs.number("x"), Some(2.0));

    assert!(attrs.merge("label", AttrValue::Null));
    assert!(!attrs.contains("label"));
    assert!(!attrs.merge("missing", AttrValue::Null));
    assert_eq!(attrs.len(), 1);
}

#[test]
fn typed_lookups_ignore_mismatched_values() {
    let attrs = Attrs::new().with("x", "not a number");
    assert_eq!(attrs.number("x"), None);
    assert_eq!(attrs.number_or("x", 7.0), 7.0);
    assert!(attrs.points("points").is_empty());
}

#[test]
fn attrs_deserialize_points_and_scalars() {
    let attrs: Attrs = serde_json::from_value(json!({
        "points": [{"x": 1.0, "y": 2.0}, {"x": 3.0, "y": 4.0}],
        "x": 5,
        "visible": true,
        "text": "hi"
    }))
    .unwrap();
    assert_eq!(attrs.points("points"), &[Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
    assert_eq!(attrs.number("x"), Some(5.0));
    assert_eq!(attrs.get("visible"), Some(&AttrValue::Bool(true)));
    assert_eq!(attrs.text("text"), Some("hi"));
}

#[test]
fn color_keys_are_normalized() {
    let styles = Styles::new()
        .with("fill", "#ff0000")
        .with("stroke", "bogus")
        .with("display", "none");
    assert_eq!(styles.color("fill"), Some(Color::rgba(1.0, 0.0, 0.0, 1.0)));
    assert_eq!(styles.text("stroke"), Some("bogus"));
    assert!(styles.is_hidden());
}

#[test]
fn deserialized_styles_normalize_on_request() {
    let styles: Styles =
        serde_json::from_value(json!({"fill": "blue", "font": "red", "opacity": 0.5})).unwrap();
    let styles = styles.normalized();
    assert_eq!(styles.color("fill"), Some(Color::rgba(0.0, 0.0, 1.0, 1.0)));
    assert_eq!(styles.text("font"), Some("red"));
    assert_eq!(styles.get("opacity").and_then(StyleValue::as_f64), Some(0.5));
}
