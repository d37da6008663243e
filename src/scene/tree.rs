//! Node arena with parent back-references.
//!
//! Nodes live in a [`SlotMap`] keyed by [`NodeId`]. A group owns its children
//! through an ordered slot list; a slot is `None` (a tombstone) when a child was
//! removed from a group with packed backend storage and the group has not been
//! reindexed since.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::backend::BackendHandle;
use crate::events::event::{EventBinding, EventType};
use crate::foundation::core::{Affine, BBox, Point};
use crate::foundation::error::{CanopyError, CanopyResult};
use crate::geometry::bbox::{compute_bounding_box, rotate_bounding_box};
use crate::geometry::hit::point_in;
use crate::geometry::transform::Transform;
use crate::scene::attr::{Attrs, ShapeKind, Styles};

slotmap::new_key_type! {
    /// Arena handle of a node.
    pub struct NodeId;
}

/// One scene node.
#[derive(Debug)]
pub struct Node {
    kind: ShapeKind,
    pub(crate) attr: Attrs,
    pub(crate) style: Styles,
    pub(crate) transform: Transform,
    bounding_box: BBox,
    hit_bounding_box: BBox,
    pub(crate) dirty: bool,
    parent: Option<NodeId>,
    children: Vec<Option<NodeId>>,
    position_index: usize,
    pending_reindex: bool,
    bbox_enabled: bool,
    pub(crate) events: HashMap<EventType, EventBinding>,
    pub(crate) handle: Option<BackendHandle>,
}

impl Node {
    fn new(
        kind: ShapeKind,
        attr: Attrs,
        style: Styles,
        transform: Transform,
        bbox_enabled: bool,
    ) -> Self {
        Self {
            kind,
            attr,
            style,
            transform,
            bounding_box: BBox::ZERO,
            hit_bounding_box: BBox::ZERO,
            dirty: true,
            parent: None,
            children: Vec::new(),
            position_index: 0,
            pending_reindex: false,
            bbox_enabled,
            events: HashMap::new(),
            handle: None,
        }
    }

    /// Shape kind.
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Attribute map.
    pub fn attr(&self) -> &Attrs {
        &self.attr
    }

    /// Style map.
    pub fn style(&self) -> &Styles {
        &self.style
    }

    /// Transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Box in parent coordinates as of the last bounding-box pass.
    pub fn bounding_box(&self) -> BBox {
        self.bounding_box
    }

    /// [`Node::bounding_box`] enclosing the rotation, if any.
    pub fn hit_bounding_box(&self) -> BBox {
        self.hit_bounding_box
    }

    /// Whether the node changed since the last bounding-box pass.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Owning group.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Live children in paint order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.children.iter().flatten().copied()
    }

    /// Raw child slots, tombstones included.
    pub fn child_slots(&self) -> &[Option<NodeId>] {
        &self.children
    }

    /// Slot index in the parent as of the last append or reindex.
    pub fn position_index(&self) -> usize {
        self.position_index
    }

    /// Whether tombstones or splices are waiting for [`NodeTree::reindex`].
    pub fn pending_reindex(&self) -> bool {
        self.pending_reindex
    }

    /// Whether the node takes part in bounding-box passes.
    pub fn bbox_enabled(&self) -> bool {
        self.bbox_enabled
    }

    /// Backend storage.
    pub fn handle(&self) -> Option<&BackendHandle> {
        self.handle.as_ref()
    }

    /// Binding for `ty`, if any.
    pub fn binding(&self, ty: EventType) -> Option<&EventBinding> {
        self.events.get(&ty)
    }

    /// Local-to-parent map. Rotation without a pivot turns about the center
    /// of the bounding box.
    pub fn affine(&self) -> Affine {
        self.transform.to_affine(self.bounding_box.center())
    }

    fn packs_children(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.packs_children)
    }
}

/// Arena of nodes.
#[derive(Debug, Default)]
pub struct NodeTree {
    nodes: SlotMap<NodeId, Node>,
}

impl NodeTree {
    /// Empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Node lookup.
    pub fn node(&self, id: NodeId) -> CanopyResult<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| CanopyError::stale_node(format!("{id:?}")))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> CanopyResult<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| CanopyError::stale_node(format!("{id:?}")))
    }

    /// Insert a detached node.
    pub(crate) fn insert(
        &mut self,
        kind: ShapeKind,
        attr: Attrs,
        style: Styles,
        transform: Transform,
        bbox_enabled: bool,
    ) -> NodeId {
        self.nodes
            .insert(Node::new(kind, attr, style, transform, bbox_enabled))
    }

    /// Append `child` to `parent`. A child that already has a parent is
    /// detached from it first.
    pub(crate) fn append(&mut self, parent: NodeId, child: NodeId) -> CanopyResult<()> {
        let p = self.node(parent)?;
        if !p.kind.is_group() {
            return Err(CanopyError::invalid_tree_shape(format!(
                "{} node cannot own children",
                p.kind
            )));
        }
        self.node(child)?;
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(CanopyError::invalid_tree_shape(
                    "a node cannot become its own descendant",
                ));
            }
            cursor = self.nodes.get(id).and_then(|n| n.parent);
        }

        self.detach(child)?;
        let p = self.node_mut(parent)?;
        let position = p.children.len();
        p.children.push(Some(child));
        p.dirty = true;
        let c = self.node_mut(child)?;
        c.parent = Some(parent);
        c.position_index = position;
        c.dirty = true;
        Ok(())
    }

    /// Unlink `child` from its parent: a packed parent keeps a tombstone, a
    /// loose parent splices the slot out. Returns the former parent.
    pub(crate) fn detach(&mut self, child: NodeId) -> CanopyResult<Option<NodeId>> {
        let Some(parent) = self.node_mut(child)?.parent.take() else {
            return Ok(None);
        };
        let p = self.node_mut(parent)?;
        if let Some(slot) = p.children.iter().position(|s| *s == Some(child)) {
            if p.packs_children() {
                p.children[slot] = None;
            } else {
                p.children.remove(slot);
            }
            p.pending_reindex = true;
        }
        p.dirty = true;
        Ok(Some(parent))
    }

    /// Detach `id` and free it with its whole subtree. Returns every freed node
    /// with its backend handle, children before parents.
    pub(crate) fn remove(
        &mut self,
        id: NodeId,
    ) -> CanopyResult<Vec<(NodeId, Option<BackendHandle>)>> {
        self.detach(id)?;
        let mut freed = Vec::new();
        self.free_subtree(id, &mut freed);
        Ok(freed)
    }

    fn free_subtree(&mut self, id: NodeId, freed: &mut Vec<(NodeId, Option<BackendHandle>)>) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        for child in node.children.iter().flatten() {
            self.free_subtree(*child, freed);
        }
        freed.push((id, node.handle));
    }

    /// Compact tombstones out of `group` and re-issue child positions.
    pub fn reindex(&mut self, group: NodeId) -> CanopyResult<()> {
        let g = self.node_mut(group)?;
        g.children.retain(Option::is_some);
        g.pending_reindex = false;
        let children: Vec<NodeId> = g.children().collect();
        for (position, child) in children.into_iter().enumerate() {
            self.node_mut(child)?.position_index = position;
        }
        Ok(())
    }

    /// Reindex every group under `root` that has a pending reindex.
    pub(crate) fn reindex_pending(&mut self, root: NodeId) -> CanopyResult<()> {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.node(id)?;
            let pending = node.pending_reindex;
            stack.extend(node.children());
            if pending {
                tracing::trace!(?id, "reindexing group");
                self.reindex(id)?;
            }
        }
        Ok(())
    }

    /// Recompute bounding boxes bottom-up from `id`.
    ///
    /// A node recomputes only when it is dirty or one of its children's boxes
    /// changed. Nodes with bounding boxes disabled are skipped with their
    /// subtree. Returns whether the box of `id` changed.
    pub fn update_bounding_box(&mut self, id: NodeId) -> CanopyResult<bool> {
        let node = self.node(id)?;
        if !node.bbox_enabled {
            return Ok(false);
        }
        let children: Vec<NodeId> = node.children().collect();
        let mut child_changed = false;
        for child in &children {
            child_changed |= self.update_bounding_box(*child)?;
        }

        let node = self.node(id)?;
        if !node.dirty && !child_changed {
            return Ok(false);
        }
        let child_boxes: Vec<BBox> = children
            .iter()
            .filter_map(|c| self.nodes.get(*c))
            .filter(|c| c.bbox_enabled)
            .map(|c| c.hit_bounding_box)
            .collect();
        let bbox = compute_bounding_box(node.kind, &node.attr, &node.transform, child_boxes);
        let hit = rotate_bounding_box(bbox, &node.transform);

        let node = self.node_mut(id)?;
        let changed = bbox != node.bounding_box || hit != node.hit_bounding_box;
        node.bounding_box = bbox;
        node.hit_bounding_box = hit;
        node.dirty = false;
        Ok(changed)
    }

    /// Whether `point`, in the parent's coordinates, hits `id`: groups test
    /// their hit bounding box, leaves test their exact shape. Hidden nodes
    /// never hit.
    pub fn hit_test(&self, id: NodeId, point: Point) -> CanopyResult<bool> {
        Ok(hits(self.node(id)?, point))
    }

    /// Deepest node under `point` (parent coordinates of `root`), searching
    /// later children first.
    pub fn pick(&self, root: NodeId, point: Point) -> Option<NodeId> {
        let node = self.nodes.get(root)?;
        if !hits(node, point) {
            return None;
        }
        if !node.kind.is_group() {
            return Some(root);
        }
        let local = node.affine().inverse() * point;
        node.children()
            .rev()
            .find_map(|child| self.pick(child, local))
            .or(Some(root))
    }

    /// `id` followed by its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.contains(id).then_some(id), |id| {
            self.nodes.get(*id).and_then(|n| n.parent)
        })
    }

    /// Map a point from layer coordinates into the local coordinates of `id`
    /// (the space its attributes are expressed in).
    pub fn to_local(&self, id: NodeId, point: Point) -> CanopyResult<Point> {
        let mut chain: Vec<NodeId> = self.ancestors(id).collect();
        chain.reverse();
        let mut p = point;
        for n in chain {
            p = self.node(n)?.affine().inverse() * p;
        }
        Ok(p)
    }
}

fn hits(node: &Node, point: Point) -> bool {
    if node.style.is_hidden() {
        return false;
    }
    if node.kind.is_group() {
        return node.hit_bounding_box.contains(point);
    }
    let local = node.affine().inverse() * point;
    point_in(node.kind, &node.attr, local)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tree.rs"]
mod tests;
