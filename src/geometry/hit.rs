use kurbo::Shape;

use crate::foundation::core::{BezPath, Point};
use crate::geometry::bbox::local_bounding_box;
use crate::scene::attr::{Attrs, ShapeKind};

/// Exact per-kind containment of a point given in the node's local coordinates.
///
/// Rect, text and image use a half-open range (`x <= px < x + w`), circles use
/// `dist <= r`, polygons use even-odd containment of the closed outline. Every
/// other kind falls back to its local bounding box.
pub fn point_in(kind: ShapeKind, attr: &Attrs, point: Point) -> bool {
    let n = |key: &str| attr.number_or(key, 0.0);
    match kind {
        ShapeKind::Rect | ShapeKind::Text | ShapeKind::Image => {
            let (x, y) = (n("x"), n("y"));
            point.x >= x && point.x < x + n("width") && point.y >= y && point.y < y + n("height")
        }
        ShapeKind::Circle => Point::new(n("cx"), n("cy")).distance(point) <= n("r"),
        ShapeKind::Polygon => polygon_path(attr.points("points"))
            .is_some_and(|path| path.winding(point) % 2 != 0),
        ShapeKind::Group => false,
        _ => local_bounding_box(kind, attr, std::iter::empty()).contains(point),
    }
}

fn polygon_path(points: &[Point]) -> Option<BezPath> {
    let (first, rest) = points.split_first()?;
    let mut path = BezPath::new();
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    path.close_path();
    Some(path)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/hit.rs"]
mod tests;
