use super::*;

#[test]
fn endpoints_are_exact_for_every_curve() {
    for (name, ease) in Ease::NAMED {
        assert_eq!(ease.apply(0.0), 0.0, "{name}");
        assert_eq!(ease.apply(1.0), 1.0, "{name}");
        assert_eq!(ease.apply(-0.5), 0.0, "{name}");
        assert_eq!(ease.apply(1.5), 1.0, "{name}");
    }
}

#[test]
fn monotone_curves_stay_in_unit_range() {
    for (name, ease) in Ease::NAMED {
        if ease == Ease::OutElastic {
            continue;
        }
        for i in 0..=100 {
            let v = ease.apply(f64::from(i) / 100.0);
            assert!((0.0..=1.0 + 1e-12).contains(&v), "{name} at {i}: {v}");
        }
    }
}

#[test]
fn in_out_curves_hit_half_at_midpoint() {
    for ease in [Ease::InOutQuad, Ease::InOutCubic, Ease::InOutQuart, Ease::InOutSine] {
        assert!((ease.apply(0.5) - 0.5).abs() < 1e-12, "{ease:?}");
    }
    assert_eq!(Ease::InQuad.apply(0.5), 0.25);
    assert_eq!(Ease::OutQuad.apply(0.5), 0.75);
}

#[test]
fn names_resolve_and_unknown_falls_back() {
    assert_eq!(Ease::from_name("default"), Ease::Linear);
    assert_eq!(Ease::from_name("easeOutBounce"), Ease::OutBounce);
    assert_eq!(Ease::from_name("easeSideways"), Ease::Linear);
    for (name, ease) in Ease::NAMED {
        assert_eq!(Ease::from_name(name), ease);
        assert_eq!(ease.name(), name);
    }
}
