pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Axis-aligned box in `{x, y, width, height}` form.
///
/// Width and height are kept as computed (a negative scale yields a negative
/// extent); [`BBox::to_rect`] normalizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl BBox {
    /// Zero-sized box at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Build a box from its origin and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box enclosing all `points`, or `None` for an empty iterator.
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// The four corners, clockwise from the origin corner.
    pub fn corners(self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }

    /// Center point.
    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Closed containment test.
    pub fn contains(self, p: Point) -> bool {
        let r = self.to_rect();
        p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
    }

    /// Convert to a normalized `kurbo::Rect`.
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    /// Convert from a `kurbo::Rect`.
    pub fn from_rect(r: Rect) -> Self {
        let r = r.abs();
        Self::new(r.x0, r.y0, r.width(), r.height())
    }

    /// Component-wise approximate equality.
    pub fn approx_eq(self, other: Self, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.width - other.width).abs() <= eps
            && (self.height - other.height).abs() <= eps
    }
}

/// Translate bounds in `[[xmin, ymin], [xmax, ymax]]` form.
///
/// Serialized as nested arrays; an infinite bound is written as `null`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    /// Lower bound `[xmin, ymin]`.
    pub min: [f64; 2],
    /// Upper bound `[xmax, ymax]`.
    pub max: [f64; 2],
}

impl Default for Extent {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl Extent {
    /// Extent that accepts every finite translate.
    pub const UNBOUNDED: Self = Self {
        min: [f64::NEG_INFINITY, f64::NEG_INFINITY],
        max: [f64::INFINITY, f64::INFINITY],
    };

    /// Build from `[[xmin, ymin], [xmax, ymax]]`.
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    /// Whether `translate` lies inside the bounds after scaling each bound by
    /// `(scale_x, scale_y)`.
    pub fn contains_scaled(self, translate: Vec2, scale_x: f64, scale_y: f64) -> bool {
        let at = |bound: f64, scale: f64| if bound.is_finite() { bound * scale } else { bound };
        translate.x >= at(self.min[0], scale_x)
            && translate.x <= at(self.max[0], scale_x)
            && translate.y >= at(self.min[1], scale_y)
            && translate.y <= at(self.max[1], scale_y)
    }
}

impl serde::Serialize for Extent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bound = |v: f64| v.is_finite().then_some(v);
        [
            [bound(self.min[0]), bound(self.min[1])],
            [bound(self.max[0]), bound(self.max[1])],
        ]
        .serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Extent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let [[x0, y0], [x1, y1]] = <[[Option<f64>; 2]; 2]>::deserialize(deserializer)?;
        Ok(Self::new(
            [x0.unwrap_or(f64::NEG_INFINITY), y0.unwrap_or(f64::NEG_INFINITY)],
            [x1.unwrap_or(f64::INFINITY), y1.unwrap_or(f64::INFINITY)],
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
