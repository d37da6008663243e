//! Scene nodes, their properties and the layer that owns them.

/// Shape kinds, attributes and styles.
pub mod attr;
/// CSS-style color parsing.
pub mod color;
/// Node tree bound to a backend and a scheduler.
pub mod layer;
/// Node arena.
pub mod tree;

pub use attr::{AttrValue, Attrs, ShapeKind, StyleValue, Styles};
pub use color::Color;
pub use layer::{AnimateSpec, ElementConfig, Layer, WeakLayer};
pub use tree::{Node, NodeId, NodeTree};
