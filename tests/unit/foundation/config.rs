use super::*;

#[test]
fn defaults_match_documented_values() {
    let cfg = CanopyConfig::default();
    assert!(cfg.layer.enable_events);
    assert!(cfg.layer.auto_update);
    assert_eq!(cfg.drag.extent, Extent::UNBOUNDED);
    assert_eq!(cfg.zoom.zoom_factor, 0.001);
    assert_eq!(cfg.zoom.scale_extent, [0.0, f64::INFINITY]);
    assert_eq!(cfg.zoom.duration_ms, 250);
    assert_eq!(cfg.zoom.ease, "default");
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = CanopyConfig::from_json_str(
        r#"{"layer": {"enable_events": false}, "zoom": {"duration_ms": 100, "scale_extent": [0.5, null]}}"#,
    )
    .unwrap();
    assert!(!cfg.layer.enable_events);
    assert!(cfg.layer.auto_update);
    assert_eq!(cfg.zoom.duration_ms, 100);
    assert_eq!(cfg.zoom.scale_extent, [0.5, f64::INFINITY]);
    assert_eq!(cfg.zoom.zoom_factor, 0.001);
}

#[test]
fn drag_extent_reads_nested_arrays() {
    let cfg =
        CanopyConfig::from_json_str(r#"{"drag": {"extent": [[-10, -10], [10, null]]}}"#).unwrap();
    assert_eq!(cfg.drag.extent, Extent::new([-10.0, -10.0], [10.0, f64::INFINITY]));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = CanopyConfig::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, CanopyError::Serde(_)));
}

#[test]
fn json_round_trips_unbounded_values() {
    let cfg = CanopyConfig::default();
    let s = cfg.to_json_string().unwrap();
    assert!(s.contains("null"));
    assert_eq!(CanopyConfig::from_json_str(&s).unwrap(), cfg);
}
