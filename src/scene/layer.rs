//! A node tree bound to one backend and one scheduler.
//!
//! [`Layer`] is a cheap, cloneable handle. It is also the render root the
//! scheduler flushes: every mutation marks the node dirty and schedules the
//! layer, and the flush reindexes, recomputes bounding boxes and calls the
//! backend once.
//!
//! No layer borrow is held while user callbacks run, so handlers and task
//! closures may mutate the layer freely.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::animation::ease::Ease;
use crate::animation::lerp::lerp_to;
use crate::animation::queue::{RenderRoot, SchedulerHandle};
use crate::animation::task::{AnimationTask, Direction, LoopCount, RootIndex, TaskId, TaskTarget};
use crate::backend::Backend;
use crate::events::event::{EventBinding, EventType};
use crate::foundation::config::LayerSettings;
use crate::foundation::core::{BBox, Point};
use crate::foundation::error::{CanopyError, CanopyResult};
use crate::geometry::transform::Transform;
use crate::scene::attr::{AttrValue, Attrs, ShapeKind, StyleValue, Styles, normalize_style};
use crate::scene::tree::{Node, NodeId, NodeTree};

/// Declarative description of one node, as accepted by [`Layer::create_el`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ElementConfig {
    /// Shape kind name (`"rect"`, `"group"`, ...).
    #[serde(rename = "el")]
    pub kind: String,
    /// Initial attributes.
    pub attr: Attrs,
    /// Initial style; color keys are normalized on creation.
    pub style: Styles,
    /// Initial transform.
    pub transform: Transform,
    /// Whether the node takes part in bounding-box passes.
    pub bbox: bool,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            kind: String::new(),
            attr: Attrs::new(),
            style: Styles::new(),
            transform: Transform::IDENTITY,
            bbox: true,
        }
    }
}

impl ElementConfig {
    /// Config for a node of kind `kind`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Add an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attr = self.attr.with(key, value);
        self
    }

    /// Add a style entry.
    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.style = self.style.with(key, value);
        self
    }

    /// Set the transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Exclude the node (and its subtree) from bounding-box passes.
    pub fn without_bbox(mut self) -> Self {
        self.bbox = false;
        self
    }
}

/// Targets and timing for [`Layer::animate_to`].
pub struct AnimateSpec {
    attrs: Vec<(String, f64)>,
    transform: Option<Transform>,
    duration: Duration,
    delay: Duration,
    ease: Ease,
    loops: LoopCount,
    direction: Direction,
    on_end: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for AnimateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimateSpec")
            .field("attrs", &self.attrs)
            .field("transform", &self.transform)
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("ease", &self.ease)
            .field("loops", &self.loops)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl AnimateSpec {
    /// Animation of length `duration` with nothing to animate yet.
    pub fn new(duration: Duration) -> Self {
        Self {
            attrs: Vec::new(),
            transform: None,
            duration,
            delay: Duration::ZERO,
            ease: Ease::default(),
            loops: LoopCount::default(),
            direction: Direction::default(),
            on_end: None,
        }
    }

    /// Animate numeric attribute `key` to `target`. A missing attribute starts at 0.
    pub fn attr(mut self, key: impl Into<String>, target: f64) -> Self {
        self.attrs.push((key.into(), target));
        self
    }

    /// Animate the transform to `target`.
    pub fn transform(mut self, target: Transform) -> Self {
        self.transform = Some(target);
        self
    }

    /// Wait before starting.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Easing curve.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Loop count.
    pub fn loops(mut self, loops: LoopCount) -> Self {
        self.loops = loops;
        self
    }

    /// Loop direction.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Called once after the final step.
    pub fn on_end(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_end = Some(Box::new(f));
        self
    }
}

/// Interior state of a [`Layer`].
pub struct LayerState {
    tree: NodeTree,
    backend: Box<dyn Backend>,
    root: NodeId,
    index: RootIndex,
    scheduler: SchedulerHandle,
    settings: LayerSettings,
}

impl LayerState {
    fn touch(&mut self, node: NodeId) -> CanopyResult<()> {
        self.tree.node_mut(node)?.dirty = true;
        self.scheduler.mark_dirty(self.index);
        Ok(())
    }

    fn spawn(
        &mut self,
        parent: NodeId,
        kind: ShapeKind,
        attr: Attrs,
        style: Styles,
        transform: Transform,
        bbox: bool,
    ) -> CanopyResult<NodeId> {
        let p = self.tree.node(parent)?;
        if !p.kind().is_group() {
            return Err(CanopyError::invalid_tree_shape(format!(
                "cannot create a {kind} under a {} node",
                p.kind()
            )));
        }
        let id = self.tree.insert(kind, attr, style.normalized(), transform, bbox);
        let node = self.tree.node_mut(id)?;
        node.handle = self
            .backend
            .create_handle(id, kind, &node.attr, &node.style);
        self.tree.append(parent, id)?;
        self.scheduler.mark_dirty(self.index);
        tracing::trace!(?id, %kind, "node created");
        Ok(id)
    }

    #[tracing::instrument(skip(self), fields(root = self.index.get()))]
    fn execute(&mut self) -> CanopyResult<()> {
        self.tree.reindex_pending(self.root)?;
        self.tree.update_bounding_box(self.root)?;
        self.backend.execute(&self.tree, self.root)
    }
}

impl Drop for LayerState {
    fn drop(&mut self) {
        self.scheduler.unregister_root(self.index);
    }
}

impl RenderRoot for RefCell<LayerState> {
    fn execute(&self) -> CanopyResult<()> {
        let mut state = self
            .try_borrow_mut()
            .map_err(|_| CanopyError::validation("layer is borrowed during flush"))?;
        state.execute()
    }
}

/// Shared handle to a node tree, its backend and its scheduler registration.
#[derive(Clone)]
pub struct Layer {
    inner: Rc<RefCell<LayerState>>,
}

/// Non-owning [`Layer`] handle held by scheduled tasks.
#[derive(Clone, Debug)]
pub struct WeakLayer(Weak<RefCell<LayerState>>);

impl WeakLayer {
    /// Layer, if it is still alive.
    pub fn upgrade(&self) -> Option<Layer> {
        self.0.upgrade().map(|inner| Layer { inner })
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(state) => f
                .debug_struct("Layer")
                .field("root", &state.root)
                .field("index", &state.index)
                .field("nodes", &state.tree.len())
                .field("settings", &state.settings)
                .finish(),
            Err(_) => f.write_str("Layer(<borrowed>)"),
        }
    }
}

impl Layer {
    /// Create a layer with an empty root group. With `auto_update` the layer
    /// registers with the scheduler and is scheduled for a first flush.
    pub fn new(
        scheduler: &SchedulerHandle,
        backend: impl Backend + 'static,
        settings: LayerSettings,
    ) -> Self {
        let mut backend: Box<dyn Backend> = Box::new(backend);
        let mut tree = NodeTree::new();
        let root = tree.insert(
            ShapeKind::Group,
            Attrs::new(),
            Styles::new(),
            Transform::IDENTITY,
            true,
        );
        let handle = backend.create_handle(root, ShapeKind::Group, &Attrs::new(), &Styles::new());
        if let Ok(node) = tree.node_mut(root) {
            node.handle = handle;
        }
        let index = scheduler.allocate_root_index();
        let inner = Rc::new(RefCell::new(LayerState {
            tree,
            backend,
            root,
            index,
            scheduler: scheduler.clone(),
            settings,
        }));
        if settings.auto_update {
            let weak = Rc::downgrade(&inner);
            let weak: Weak<dyn RenderRoot> = weak;
            scheduler.attach_root(index, weak);
            scheduler.mark_dirty(index);
        }
        Self { inner }
    }

    /// Non-owning handle.
    pub fn downgrade(&self) -> WeakLayer {
        WeakLayer(Rc::downgrade(&self.inner))
    }

    /// Root group.
    pub fn root(&self) -> NodeId {
        self.inner.borrow().root
    }

    /// Index under which the layer is (or would be) registered.
    pub fn index(&self) -> RootIndex {
        self.inner.borrow().index
    }

    /// Scheduler this layer reports to.
    pub fn scheduler(&self) -> SchedulerHandle {
        self.inner.borrow().scheduler.clone()
    }

    /// Behavior switches.
    pub fn settings(&self) -> LayerSettings {
        self.inner.borrow().settings
    }

    /// Turn event delivery on or off.
    pub fn set_enable_events(&self, enable: bool) {
        self.inner.borrow_mut().settings.enable_events = enable;
    }

    /// Create a node of `kind` under `parent`.
    pub fn create_node(
        &self,
        parent: NodeId,
        kind: ShapeKind,
        attr: Attrs,
    ) -> CanopyResult<NodeId> {
        self.inner
            .borrow_mut()
            .spawn(parent, kind, attr, Styles::new(), Transform::IDENTITY, true)
    }

    /// Create a node from a declarative config. An unknown kind creates
    /// nothing and returns `Ok(None)`.
    pub fn create_el(&self, parent: NodeId, config: ElementConfig) -> CanopyResult<Option<NodeId>> {
        let kind = match config.kind.parse::<ShapeKind>() {
            Ok(kind) => kind,
            Err(err) => {
                tracing::warn!(%err, "skipping element");
                return Ok(None);
            }
        };
        self.inner
            .borrow_mut()
            .spawn(parent, kind, config.attr, config.style, config.transform, config.bbox)
            .map(Some)
    }

    /// Create several nodes in order; unknown kinds are skipped.
    pub fn create_els(
        &self,
        parent: NodeId,
        configs: impl IntoIterator<Item = ElementConfig>,
    ) -> CanopyResult<Vec<NodeId>> {
        let mut out = Vec::new();
        for config in configs {
            if let Some(id) = self.create_el(parent, config)? {
                out.push(id);
            }
        }
        Ok(out)
    }

    /// Append existing nodes to `parent`, moving them from their current parent.
    pub fn child(&self, parent: NodeId, nodes: &[NodeId]) -> CanopyResult<()> {
        let mut state = self.inner.borrow_mut();
        for &node in nodes {
            state.tree.append(parent, node)?;
        }
        state.scheduler.mark_dirty(state.index);
        Ok(())
    }

    /// Remove `node` and its subtree. Packed parents keep a tombstone until
    /// the next reindex. Tasks animating removed nodes are cancelled.
    pub fn remove(&self, node: NodeId) -> CanopyResult<()> {
        let mut state = self.inner.borrow_mut();
        if node == state.root {
            return Err(CanopyError::invalid_tree_shape("the layer root cannot be removed"));
        }
        let freed = state.tree.remove(node)?;
        let root = state.index;
        for (id, handle) in freed {
            state.backend.on_remove(id, handle);
            state.scheduler.cancel_target(TaskTarget::Node { root, node: id });
        }
        state.scheduler.mark_dirty(root);
        tracing::debug!(?node, "node removed");
        Ok(())
    }

    /// Remove `child` from `parent`. Fails when `child` is not a child of `parent`.
    pub fn remove_child(&self, parent: NodeId, child: NodeId) -> CanopyResult<()> {
        let actual = self.inner.borrow().tree.node(child)?.parent();
        if actual != Some(parent) {
            return Err(CanopyError::invalid_tree_shape(format!(
                "{child:?} is not a child of {parent:?}"
            )));
        }
        self.remove(child)
    }

    /// Merge one attribute; `AttrValue::Null` deletes it. Geometry is
    /// recomputed on the next flush.
    pub fn set_attr(
        &self,
        node: NodeId,
        key: &str,
        value: impl Into<AttrValue>,
    ) -> CanopyResult<()> {
        let value = value.into();
        let state = &mut *self.inner.borrow_mut();
        let n = state.tree.node_mut(node)?;
        if !n.attr.merge(key, value.clone()) {
            return Ok(());
        }
        state.backend.on_attr_change(node, n.handle.as_mut(), key, &value);
        state.touch(node)
    }

    /// Merge several attributes.
    pub fn set_attrs(&self, node: NodeId, attrs: Attrs) -> CanopyResult<()> {
        for (key, value) in attrs.iter() {
            self.set_attr(node, key, value.clone())?;
        }
        Ok(())
    }

    /// Merge one style entry, normalizing color keys. `StyleValue::Null` deletes it.
    pub fn set_style(
        &self,
        node: NodeId,
        key: &str,
        value: impl Into<StyleValue>,
    ) -> CanopyResult<()> {
        let value = normalize_style(key, value.into());
        let state = &mut *self.inner.borrow_mut();
        let n = state.tree.node_mut(node)?;
        let current = n.style.get(key);
        if current == Some(&value) || (current.is_none() && value == StyleValue::Null) {
            return Ok(());
        }
        n.style.insert_normalized(key.to_owned(), value.clone());
        state.backend.on_style_change(node, n.handle.as_mut(), key, &value);
        state.touch(node)
    }

    /// Merge several style entries.
    pub fn set_styles(&self, node: NodeId, styles: Styles) -> CanopyResult<()> {
        for (key, value) in styles.iter() {
            self.set_style(node, key, value.clone())?;
        }
        Ok(())
    }

    /// Replace the transform.
    pub fn set_transform(&self, node: NodeId, transform: Transform) -> CanopyResult<()> {
        let mut state = self.inner.borrow_mut();
        let n = state.tree.node_mut(node)?;
        if n.transform == transform {
            return Ok(());
        }
        n.transform = transform;
        state.touch(node)
    }

    /// Attribute value, if set.
    pub fn get_attr(&self, node: NodeId, key: &str) -> CanopyResult<Option<AttrValue>> {
        self.with_node(node, |n| n.attr().get(key).cloned())
    }

    /// Style value, if set.
    pub fn get_style(&self, node: NodeId, key: &str) -> CanopyResult<Option<StyleValue>> {
        self.with_node(node, |n| n.style().get(key).cloned())
    }

    /// Current transform.
    pub fn transform(&self, node: NodeId) -> CanopyResult<Transform> {
        self.with_node(node, |n| *n.transform())
    }

    /// Bounding box as of the last pass.
    pub fn bounding_box(&self, node: NodeId) -> CanopyResult<BBox> {
        self.with_node(node, Node::bounding_box)
    }

    /// Hit bounding box as of the last pass.
    pub fn hit_bounding_box(&self, node: NodeId) -> CanopyResult<BBox> {
        self.with_node(node, Node::hit_bounding_box)
    }

    /// Live children in paint order.
    pub fn children(&self, node: NodeId) -> CanopyResult<Vec<NodeId>> {
        self.with_node(node, |n| n.children().collect())
    }

    /// Owning group.
    pub fn parent(&self, node: NodeId) -> CanopyResult<Option<NodeId>> {
        self.with_node(node, Node::parent)
    }

    /// Shape kind.
    pub fn kind(&self, node: NodeId) -> CanopyResult<ShapeKind> {
        self.with_node(node, Node::kind)
    }

    /// Run `f` on a node.
    pub fn with_node<R>(&self, node: NodeId, f: impl FnOnce(&Node) -> R) -> CanopyResult<R> {
        Ok(f(self.inner.borrow().tree.node(node)?))
    }

    /// Run `f` on the whole tree.
    pub fn with_tree<R>(&self, f: impl FnOnce(&NodeTree) -> R) -> R {
        f(&self.inner.borrow().tree)
    }

    /// Recompute bounding boxes under `node` now. Returns whether its box changed.
    pub fn update_bounding_box(&self, node: NodeId) -> CanopyResult<bool> {
        self.inner.borrow_mut().tree.update_bounding_box(node)
    }

    /// Compact tombstones out of `group` now.
    pub fn reindex(&self, group: NodeId) -> CanopyResult<()> {
        self.inner.borrow_mut().tree.reindex(group)
    }

    /// See [`NodeTree::hit_test`].
    pub fn hit_test(&self, node: NodeId, point: Point) -> CanopyResult<bool> {
        self.inner.borrow().tree.hit_test(node, point)
    }

    /// Deepest node under `point` in layer coordinates.
    pub fn pick(&self, point: Point) -> Option<NodeId> {
        let state = self.inner.borrow();
        state.tree.pick(state.root, point)
    }

    /// Map a layer point into the local coordinates of `node`.
    pub fn to_local(&self, node: NodeId, point: Point) -> CanopyResult<Point> {
        self.inner.borrow().tree.to_local(node, point)
    }

    /// Reindex, recompute bounding boxes and draw now, outside the scheduler.
    pub fn execute(&self) -> CanopyResult<()> {
        self.inner.borrow_mut().execute()
    }

    /// Schedule this layer for the next flush.
    pub fn mark_dirty(&self) {
        let state = self.inner.borrow();
        state.scheduler.mark_dirty(state.index);
    }

    /// Unregister from the scheduler and remove every node below the root.
    pub fn destroy(&self) -> CanopyResult<()> {
        let (scheduler, index, children) = {
            let state = self.inner.borrow();
            let children: Vec<NodeId> = state.tree.node(state.root)?.children().collect();
            (state.scheduler.clone(), state.index, children)
        };
        scheduler.unregister_root(index);
        for child in children {
            self.remove(child)?;
        }
        tracing::debug!(root = index.get(), "layer destroyed");
        Ok(())
    }

    /// Bind `binding` to `ty` on `node`, replacing any previous binding.
    pub fn on(
        &self,
        node: NodeId,
        ty: EventType,
        binding: impl Into<EventBinding>,
    ) -> CanopyResult<()> {
        let mut state = self.inner.borrow_mut();
        state.tree.node_mut(node)?.events.insert(ty, binding.into());
        Ok(())
    }

    /// Remove the binding for `ty` on `node`.
    pub fn off(&self, node: NodeId, ty: EventType) -> CanopyResult<Option<EventBinding>> {
        let mut state = self.inner.borrow_mut();
        Ok(state.tree.node_mut(node)?.events.remove(&ty))
    }

    /// Binding for `ty` on `node`, if any.
    pub fn binding(&self, node: NodeId, ty: EventType) -> Option<EventBinding> {
        let state = self.inner.borrow();
        state.tree.node(node).ok()?.binding(ty).cloned()
    }

    /// Schedule interpolation of numeric attributes and the transform from
    /// their current values to the targets in `spec`.
    pub fn animate_to(&self, node: NodeId, spec: AnimateSpec) -> CanopyResult<TaskId> {
        let AnimateSpec {
            attrs,
            transform,
            duration,
            delay,
            ease,
            loops,
            direction,
            on_end,
        } = spec;
        let (scheduler, target, values, from) = {
            let state = self.inner.borrow();
            let n = state.tree.node(node)?;
            let values: Vec<(String, f64, f64)> = attrs
                .into_iter()
                .map(|(key, to)| {
                    let from = n.attr().number_or(&key, 0.0);
                    (key, from, to)
                })
                .collect();
            let target = TaskTarget::Node {
                root: state.index,
                node,
            };
            (state.scheduler.clone(), target, values, *n.transform())
        };

        let weak = self.downgrade();
        let mut task = AnimationTask::new(move |f| {
            let Some(layer) = weak.upgrade() else {
                return;
            };
            let attrs: Attrs = values
                .iter()
                .map(|(key, a, b)| (key.clone(), lerp_to(a, b, f)))
                .collect();
            let mut result = layer.set_attrs(node, attrs);
            if let Some(to) = &transform {
                result = result.and_then(|()| layer.set_transform(node, lerp_to(&from, to, f)));
            }
            if let Err(err) = result {
                tracing::trace!(%err, "animation step skipped");
            }
        })
        .target(target)
        .duration(duration)
        .delay(delay)
        .ease(ease)
        .loops(loops)
        .direction(direction);
        if let Some(on_end) = on_end {
            task = task.on_end(on_end);
        }
        Ok(scheduler.add_task(task))
    }

    /// Cancel every task animating `node`. Values already applied stay.
    pub fn interrupt(&self, node: NodeId) {
        let state = self.inner.borrow();
        state.scheduler.cancel_target(TaskTarget::Node {
            root: state.index,
            node,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layer.rs"]
mod tests;
