use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CanopyError::invalid_tree_shape("x")
            .to_string()
            .contains("invalid tree shape:")
    );
    assert!(
        CanopyError::unknown_shape_kind("hexagon")
            .to_string()
            .contains("unknown shape kind: hexagon")
    );
    assert!(
        CanopyError::stale_node("x")
            .to_string()
            .contains("stale node reference:")
    );
    assert!(
        CanopyError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CanopyError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert_eq!(
        CanopyError::StaleTaskReference(7).to_string(),
        "stale task reference: 7"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CanopyError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
