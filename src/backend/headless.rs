use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::backend::{Backend, BackendHandle, TextureCache};
use crate::foundation::core::{Affine, BBox};
use crate::foundation::error::{CanopyError, CanopyResult};
use crate::scene::attr::{AttrValue, Attrs, ShapeKind, StyleValue, Styles};
use crate::scene::color::Color;
use crate::scene::tree::{NodeId, NodeTree};

/// One call received by a [`HeadlessBackend`].
#[derive(Clone, Debug, PartialEq)]
pub enum BackendCall {
    /// `create_handle`.
    Create {
        /// New node.
        node: NodeId,
        /// Its kind.
        kind: ShapeKind,
    },
    /// `on_attr_change`.
    AttrChange {
        /// Changed node.
        node: NodeId,
        /// Written key.
        key: String,
    },
    /// `on_style_change`.
    StyleChange {
        /// Changed node.
        node: NodeId,
        /// Written key.
        key: String,
    },
    /// `on_remove`.
    Remove {
        /// Removed node.
        node: NodeId,
    },
    /// `execute`, with the number of items drawn.
    Execute {
        /// Leaves drawn.
        items: usize,
    },
}

/// One leaf drawn by [`HeadlessBackend::execute`], in paint order.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    /// Drawn node.
    pub node: NodeId,
    /// Its kind.
    pub kind: ShapeKind,
    /// Hit bounding box in parent coordinates.
    pub bbox: BBox,
    /// Parent-to-layer transform.
    pub world: Affine,
    /// Normalized fill, if any.
    pub fill: Option<Color>,
    /// Cached texture key for images.
    pub texture: Option<String>,
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<BackendCall>,
    executes: usize,
    last_frame: Vec<DrawItem>,
}

/// Shared view of everything a [`HeadlessBackend`] received.
#[derive(Clone, Debug, Default)]
pub struct Recording(Rc<RefCell<RecordingState>>);

impl Recording {
    /// Calls in arrival order.
    pub fn calls(&self) -> Ref<'_, [BackendCall]> {
        Ref::map(self.0.borrow(), |s| s.calls.as_slice())
    }

    /// Number of `execute` calls.
    pub fn executes(&self) -> usize {
        self.0.borrow().executes
    }

    /// Items drawn by the most recent `execute`.
    pub fn last_frame(&self) -> Vec<DrawItem> {
        self.0.borrow().last_frame.clone()
    }

    /// Forget recorded calls (the execute counter is kept).
    pub fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }

    fn push(&self, call: BackendCall) {
        self.0.borrow_mut().calls.push(call);
    }
}

/// Backend that draws nothing and records every call.
///
/// Image sources resolve through an explicit [`TextureCache`]; an image with
/// an empty `src` fails the pass.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    recording: Recording,
    packs_groups: bool,
    textures: TextureCache<String>,
}

impl HeadlessBackend {
    /// Backend with loose group storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose groups use packed storage (removals tombstone).
    pub fn packed() -> Self {
        Self {
            packs_groups: true,
            ..Self::default()
        }
    }

    /// Use `cache` for image sources.
    pub fn with_texture_cache(mut self, cache: TextureCache<String>) -> Self {
        self.textures = cache;
        self
    }

    /// Shared recording handle.
    pub fn recording(&self) -> Recording {
        self.recording.clone()
    }

    fn draw(
        &mut self,
        tree: &NodeTree,
        id: NodeId,
        world: Affine,
        out: &mut Vec<DrawItem>,
    ) -> CanopyResult<()> {
        let node = tree.node(id)?;
        if node.style().is_hidden() {
            return Ok(());
        }
        if node.kind().is_group() {
            let inner = world * node.affine();
            for child in node.children() {
                self.draw(tree, child, inner, out)?;
            }
            return Ok(());
        }
        let texture = match node.kind() {
            ShapeKind::Image => {
                let src = node.attr().text("src").unwrap_or_default();
                let key = self.textures.get_or_load(src, |s| {
                    if s.is_empty() {
                        return Err(CanopyError::validation("image node without src"));
                    }
                    Ok(format!("texture:{s}"))
                })?;
                Some(key.clone())
            }
            _ => None,
        };
        out.push(DrawItem {
            node: id,
            kind: node.kind(),
            bbox: node.hit_bounding_box(),
            world,
            fill: node.style().color("fill"),
            texture,
        });
        Ok(())
    }
}

impl Backend for HeadlessBackend {
    fn create_handle(
        &mut self,
        node: NodeId,
        kind: ShapeKind,
        _attr: &Attrs,
        _style: &Styles,
    ) -> Option<BackendHandle> {
        self.recording.push(BackendCall::Create { node, kind });
        Some(if kind.is_group() && self.packs_groups {
            BackendHandle::packed(kind)
        } else {
            BackendHandle::new(kind)
        })
    }

    fn on_attr_change(
        &mut self,
        node: NodeId,
        _handle: Option<&mut BackendHandle>,
        key: &str,
        _value: &AttrValue,
    ) {
        self.recording.push(BackendCall::AttrChange {
            node,
            key: key.to_owned(),
        });
    }

    fn on_style_change(
        &mut self,
        node: NodeId,
        _handle: Option<&mut BackendHandle>,
        key: &str,
        _value: &StyleValue,
    ) {
        self.recording.push(BackendCall::StyleChange {
            node,
            key: key.to_owned(),
        });
    }

    fn on_remove(&mut self, node: NodeId, _handle: Option<BackendHandle>) {
        self.recording.push(BackendCall::Remove { node });
    }

    #[tracing::instrument(skip(self, tree))]
    fn execute(&mut self, tree: &NodeTree, root: NodeId) -> CanopyResult<()> {
        let mut frame = Vec::new();
        self.draw(tree, root, Affine::IDENTITY, &mut frame)?;
        tracing::trace!(items = frame.len(), "headless frame");
        let mut state = self.recording.0.borrow_mut();
        state.executes += 1;
        state.calls.push(BackendCall::Execute { items: frame.len() });
        state.last_frame = frame;
        Ok(())
    }
}
