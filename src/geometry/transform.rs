//! Node transforms: `{translate, scale, rotate}` and their flattened form.

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Affine, Point, Vec2};

/// Scale component. A one-element scale is uniform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scale {
    /// `[k]`: same factor on both axes.
    Uniform(f64),
    /// `[sx, sy]`.
    Axes(f64, f64),
}

impl Scale {
    /// `(scale_x, scale_y)`.
    pub fn factors(self) -> (f64, f64) {
        match self {
            Self::Uniform(k) => (k, k),
            Self::Axes(sx, sy) => (sx, sy),
        }
    }
}

impl Serialize for Scale {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Uniform(k) => [k].serialize(serializer),
            Self::Axes(sx, sy) => [sx, sy].serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Scale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Arr(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(k) => Ok(Self::Uniform(k)),
            Repr::Arr(v) => match v.as_slice() {
                [k] => Ok(Self::Uniform(*k)),
                [sx, sy] => Ok(Self::Axes(*sx, *sy)),
                _ => Err(serde::de::Error::custom("scale must be [k] or [sx, sy]")),
            },
        }
    }
}

/// Rotation in degrees, optionally about an explicit pivot.
///
/// The pivot is expressed before translation; without one, rotation is about
/// the center of the box being rotated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotate {
    /// Clockwise angle in degrees.
    pub angle: f64,
    /// Pivot `(cx, cy)` in untranslated coordinates.
    pub pivot: Option<Point>,
}

impl Serialize for Rotate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.pivot {
            Some(p) => [self.angle, p.x, p.y].serialize(serializer),
            None => [self.angle].serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Rotate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Arr(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(angle) => Ok(Self { angle, pivot: None }),
            Repr::Arr(v) => match v.as_slice() {
                [angle] => Ok(Self {
                    angle: *angle,
                    pivot: None,
                }),
                [angle, cx, cy] => Ok(Self {
                    angle: *angle,
                    pivot: Some(Point::new(*cx, *cy)),
                }),
                _ => Err(serde::de::Error::custom("rotate must be [angle] or [angle, cx, cy]")),
            },
        }
    }
}

/// A node transform. Every component is optional; missing components are identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// `[x, y]` offset applied after scaling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate: Option<[f64; 2]>,
    /// Scale factors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    /// Rotation, applied last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<Rotate>,
}

/// Flattened translate/scale with defaults applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParsedTransform {
    /// Horizontal offset.
    pub translate_x: f64,
    /// Vertical offset.
    pub translate_y: f64,
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
}

impl Default for ParsedTransform {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

/// Flatten a transform: missing translate is `(0, 0)`, missing scale is `(1, 1)`
/// and a one-element scale is uniform.
pub fn parse_transform(transform: &Transform) -> ParsedTransform {
    let mut out = ParsedTransform::default();
    if let Some([tx, ty]) = transform.translate {
        out.translate_x = tx;
        out.translate_y = ty;
    }
    if let Some(scale) = transform.scale {
        (out.scale_x, out.scale_y) = scale.factors();
    }
    out
}

impl Transform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        translate: None,
        scale: None,
        rotate: None,
    };

    /// Pure translation.
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            translate: Some([x, y]),
            ..Self::IDENTITY
        }
    }

    /// Replace the translate component.
    pub fn with_translate(mut self, x: f64, y: f64) -> Self {
        self.translate = Some([x, y]);
        self
    }

    /// Replace the scale component with a uniform factor.
    pub fn with_scale(mut self, k: f64) -> Self {
        self.scale = Some(Scale::Uniform(k));
        self
    }

    /// Replace the scale component with per-axis factors.
    pub fn with_scale_xy(mut self, sx: f64, sy: f64) -> Self {
        self.scale = Some(Scale::Axes(sx, sy));
        self
    }

    /// Rotate about the center of the transformed box.
    pub fn with_rotate(mut self, angle: f64) -> Self {
        self.rotate = Some(Rotate { angle, pivot: None });
        self
    }

    /// Rotate about an explicit (untranslated) pivot.
    pub fn with_rotate_about(mut self, angle: f64, cx: f64, cy: f64) -> Self {
        self.rotate = Some(Rotate {
            angle,
            pivot: Some(Point::new(cx, cy)),
        });
        self
    }

    /// Flattened translate/scale.
    pub fn parse(&self) -> ParsedTransform {
        parse_transform(self)
    }

    /// Translate as a vector.
    pub fn translation(&self) -> Vec2 {
        let p = self.parse();
        Vec2::new(p.translate_x, p.translate_y)
    }

    /// Rotation pivot in output space, if the transform rotates.
    ///
    /// `fallback` is used when the rotation carries no explicit pivot.
    pub fn rotation_pivot(&self, fallback: Point) -> Option<Point> {
        let rotate = self.rotate?;
        let p = self.parse();
        Some(match rotate.pivot {
            Some(c) => Point::new(c.x + p.translate_x, c.y + p.translate_y),
            None => fallback,
        })
    }

    /// Local-to-parent affine map: scale, then translate, then rotate about the pivot.
    pub fn to_affine(&self, fallback_pivot: Point) -> Affine {
        let p = self.parse();
        let base = Affine::translate((p.translate_x, p.translate_y))
            * Affine::scale_non_uniform(p.scale_x, p.scale_y);
        match (self.rotate, self.rotation_pivot(fallback_pivot)) {
            (Some(r), Some(pivot)) => Affine::rotate_about(r.angle.to_radians(), pivot) * base,
            _ => base,
        }
    }

    /// Rotation with the same pivot and the opposite angle.
    pub fn inverse_rotation(&self) -> Self {
        let mut out = *self;
        if let Some(r) = out.rotate.as_mut() {
            r.angle = -r.angle;
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/transform.rs"]
mod tests;
