use super::*;
use serde_json::json;

fn close(a: Color, b: Color) -> bool {
    (a.r - b.r).abs() < 1e-9
        && (a.g - b.g).abs() < 1e-9
        && (a.b - b.b).abs() < 1e-9
        && (a.a - b.a).abs() < 1e-9
}

#[test]
fn parses_hex_forms() {
    assert_eq!(Color::parse("#ff0000").unwrap(), Color::rgba(1.0, 0.0, 0.0, 1.0));
    assert_eq!(Color::parse("#F00").unwrap(), Color::rgba(1.0, 0.0, 0.0, 1.0));

    let c = Color::parse("#0000ff80").unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);

    assert!(Color::parse("#12345").is_err());
    assert!(Color::parse("#zzzzzz").is_err());
}

#[test]
fn parses_functional_forms() {
    assert!(close(
        Color::parse("rgb(255, 0, 0)").unwrap(),
        Color::rgba(1.0, 0.0, 0.0, 1.0)
    ));
    assert!(close(
        Color::parse("rgba(0, 255, 0, 0.5)").unwrap(),
        Color::rgba(0.0, 1.0, 0.0, 0.5)
    ));
    assert!(close(
        Color::parse("hsl(0, 100%, 50%)").unwrap(),
        Color::rgba(1.0, 0.0, 0.0, 1.0)
    ));
    assert!(close(
        Color::parse("hsla(240deg, 100%, 50%, 0.25)").unwrap(),
        Color::rgba(0.0, 0.0, 1.0, 0.25)
    ));
    assert!(Color::parse("rgb(1, 2)").is_err());
}

#[test]
fn parses_named_colors_case_insensitively() {
    assert_eq!(Color::parse("White").unwrap(), Color::rgba(1.0, 1.0, 1.0, 1.0));
    assert_eq!(Color::parse("transparent").unwrap(), Color::TRANSPARENT);
    let err = Color::parse("notacolor").unwrap_err();
    assert!(err.to_string().contains("notacolor"));
}

#[test]
fn rgba8_and_css_round() {
    let c = Color::rgba(1.0, 0.5, 0.0, 0.5);
    assert_eq!(c.to_rgba8(), [255, 128, 0, 128]);
    assert_eq!(c.to_css(), "rgba(255, 128, 0, 0.5)");
}

#[test]
fn deserializes_string_object_and_array() {
    let c: Color = serde_json::from_value(json!("#00ff00")).unwrap();
    assert_eq!(c, Color::rgba(0.0, 1.0, 0.0, 1.0));

    let c: Color = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 1.0));

    let c: Color = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 0.9));

    assert!(serde_json::from_value::<Color>(json!([0.1, 0.2])).is_err());
}
