use std::f64::consts::PI;

/// Named easing curve mapping normalized progress to eased progress.
///
/// Every curve satisfies `apply(0) == 0` and `apply(1) == 1` exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// `t`.
    #[default]
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in-out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in-out.
    InOutCubic,
    /// Quartic ease-in.
    InQuart,
    /// Quartic ease-out.
    OutQuart,
    /// Quartic ease-in-out.
    InOutQuart,
    /// Sinusoidal ease-in.
    InSine,
    /// Sinusoidal ease-out.
    OutSine,
    /// Sinusoidal ease-in-out.
    InOutSine,
    /// Damped overshooting spring.
    OutElastic,
    /// Decaying bounces settling at 1.
    OutBounce,
}

impl Ease {
    /// Every curve with its lookup name.
    pub const NAMED: [(&'static str, Self); 15] = [
        ("linear", Self::Linear),
        ("easeInQuad", Self::InQuad),
        ("easeOutQuad", Self::OutQuad),
        ("easeInOutQuad", Self::InOutQuad),
        ("easeInCubic", Self::InCubic),
        ("easeOutCubic", Self::OutCubic),
        ("easeInOutCubic", Self::InOutCubic),
        ("easeInQuart", Self::InQuart),
        ("easeOutQuart", Self::OutQuart),
        ("easeInOutQuart", Self::InOutQuart),
        ("easeInSine", Self::InSine),
        ("easeOutSine", Self::OutSine),
        ("easeInOutSine", Self::InOutSine),
        ("easeOutElastic", Self::OutElastic),
        ("easeOutBounce", Self::OutBounce),
    ];

    /// Look a curve up by name. `"default"` is linear; unknown names fall back
    /// to the default curve with a warning.
    pub fn from_name(name: &str) -> Self {
        if name == "default" {
            return Self::default();
        }
        match Self::NAMED.iter().find(|(n, _)| *n == name) {
            Some((_, ease)) => *ease,
            None => {
                tracing::warn!(name, "unknown easing curve, using default");
                Self::default()
            }
        }
    }

    /// Lookup name of this curve.
    pub fn name(self) -> &'static str {
        Self::NAMED
            .iter()
            .find(|(_, e)| *e == self)
            .map_or("linear", |(n, _)| *n)
    }

    /// Eased progress for `t`, clamped to `[0, 1]` at the ends.
    pub fn apply(self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(4) / 2.0)
                }
            }
            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::OutElastic => {
                let c4 = (2.0 * PI) / 3.0;
                2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
            }
            Self::OutBounce => out_bounce(t),
        }
    }
}

fn out_bounce(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
