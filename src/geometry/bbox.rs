//! Per-kind bounding boxes and rotated hit boxes.

use crate::foundation::core::{Affine, BBox, Point};
use crate::geometry::transform::Transform;
use crate::scene::attr::{Attrs, ShapeKind};

/// Untransformed extent of a leaf, or the union of `children` for a group.
///
/// Missing numeric attributes read as `0`. An empty point list or a group
/// without live children yields [`BBox::ZERO`].
pub fn local_bounding_box(
    kind: ShapeKind,
    attr: &Attrs,
    children: impl IntoIterator<Item = BBox>,
) -> BBox {
    let n = |key: &str| attr.number_or(key, 0.0);
    match kind {
        ShapeKind::Point => {
            let size = n("size");
            BBox::new(n("x"), n("y"), size, size)
        }
        ShapeKind::Rect | ShapeKind::Text | ShapeKind::Image => {
            BBox::new(n("x"), n("y"), n("width"), n("height"))
        }
        ShapeKind::Line => {
            let (x1, y1, x2, y2) = (n("x1"), n("y1"), n("x2"), n("y2"));
            BBox::new(x1.min(x2), y1.min(y2), (x2 - x1).abs(), (y2 - y1).abs())
        }
        ShapeKind::Polyline | ShapeKind::Polygon => {
            BBox::enclosing(attr.points("points").iter().copied()).unwrap_or(BBox::ZERO)
        }
        ShapeKind::Circle => {
            let r = n("r");
            BBox::new(n("cx") - r, n("cy") - r, 2.0 * r, 2.0 * r)
        }
        ShapeKind::Group => union(children).unwrap_or(BBox::ZERO),
    }
}

/// Bounding box in parent coordinates: the local extent scaled, then translated.
///
/// `children` are the hit boxes of a group's live children and are ignored for
/// leaves.
pub fn compute_bounding_box(
    kind: ShapeKind,
    attr: &Attrs,
    transform: &Transform,
    children: impl IntoIterator<Item = BBox>,
) -> BBox {
    let local = local_bounding_box(kind, attr, children);
    let t = transform.parse();
    BBox::new(
        t.translate_x + local.x * t.scale_x,
        t.translate_y + local.y * t.scale_y,
        local.width * t.scale_x,
        local.height * t.scale_y,
    )
}

/// Axis-aligned box enclosing `bbox` rotated by `transform.rotate`.
///
/// The pivot is `(cx + tx, cy + ty)`, or the box center when the rotation has
/// no pivot. Without a rotation the box is returned unchanged.
pub fn rotate_bounding_box(bbox: BBox, transform: &Transform) -> BBox {
    let (Some(rotate), Some(pivot)) = (transform.rotate, transform.rotation_pivot(bbox.center()))
    else {
        return bbox;
    };
    rotate_corners(bbox, rotate.angle, pivot)
}

fn rotate_corners(bbox: BBox, angle_deg: f64, pivot: Point) -> BBox {
    let rot = Affine::rotate_about(angle_deg.to_radians(), pivot);
    BBox::enclosing(bbox.corners().map(|c| rot * c)).unwrap_or(bbox)
}

fn union(boxes: impl IntoIterator<Item = BBox>) -> Option<BBox> {
    BBox::enclosing(boxes.into_iter().flat_map(|b| {
        let r = b.to_rect();
        [Point::new(r.x0, r.y0), Point::new(r.x1, r.y1)]
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/bbox.rs"]
mod tests;
