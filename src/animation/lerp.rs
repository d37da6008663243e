use crate::geometry::transform::{Rotate, Scale, Transform};

/// Linear interpolation between two values of the same type.
pub trait Lerp: Sized {
    /// Value at fraction `t` between `a` (at 0) and `b` (at 1).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// Interpolate, landing on `b` exactly at `t == 1`. Progress outside
/// `[0, 1]` (overshooting curves) extrapolates.
pub fn lerp_to<T: Lerp + Clone>(a: &T, b: &T, t: f64) -> T {
    if t == 1.0 { b.clone() } else { T::lerp(a, b, t) }
}

impl Lerp for Transform {
    /// Components missing on one side interpolate from or to identity; a
    /// rotation keeps the pivot of `b`, else of `a`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let (pa, pb) = (a.parse(), b.parse());
        let translate = (a.translate.is_some() || b.translate.is_some()).then(|| {
            [
                f64::lerp(&pa.translate_x, &pb.translate_x, t),
                f64::lerp(&pa.translate_y, &pb.translate_y, t),
            ]
        });
        let scale = (a.scale.is_some() || b.scale.is_some()).then(|| {
            let sx = f64::lerp(&pa.scale_x, &pb.scale_x, t);
            let sy = f64::lerp(&pa.scale_y, &pb.scale_y, t);
            if sx == sy { Scale::Uniform(sx) } else { Scale::Axes(sx, sy) }
        });
        let rotate = match (a.rotate, b.rotate) {
            (None, None) => None,
            (ra, rb) => {
                let from = ra.map_or(0.0, |r| r.angle);
                let to = rb.map_or(0.0, |r| r.angle);
                Some(Rotate {
                    angle: f64::lerp(&from, &to, t),
                    pivot: rb.and_then(|r| r.pivot).or(ra.and_then(|r| r.pivot)),
                })
            }
        };
        Self {
            translate,
            scale,
            rotate,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/lerp.rs"]
mod tests;
