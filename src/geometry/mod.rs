//! Pure geometry: transforms, bounding boxes and hit tests.

/// Per-kind bounding boxes and rotated hit boxes.
pub mod bbox;
/// Per-kind point containment.
pub mod hit;
/// Node transforms.
pub mod transform;

pub use bbox::{compute_bounding_box, local_bounding_box, rotate_bounding_box};
pub use hit::point_in;
pub use transform::{ParsedTransform, Rotate, Scale, Transform, parse_transform};
