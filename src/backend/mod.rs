//! Rendering backend boundary.
//!
//! A layer forwards node lifecycle and property changes to its [`Backend`] and
//! calls [`Backend::execute`] once per flush with the up-to-date tree. Concrete
//! surfaces (canvas, SVG, GPU, PDF) live outside this crate; [`HeadlessBackend`]
//! records calls for tests and headless use.

use std::any::Any;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use crate::foundation::error::CanopyResult;
use crate::scene::attr::{AttrValue, Attrs, ShapeKind, StyleValue, Styles};
use crate::scene::tree::{NodeId, NodeTree};

mod headless;

pub use headless::{BackendCall, DrawItem, HeadlessBackend, Recording};

/// Backend-owned per-node storage.
pub struct BackendHandle {
    /// Whether a group's children live in backend-allocated packed storage.
    /// Removing from a packed group tombstones the slot until reindex instead
    /// of splicing it out.
    pub packs_children: bool,
    /// Opaque backend state.
    pub state: Box<dyn Any>,
}

impl BackendHandle {
    /// Handle with loose children.
    pub fn new(state: impl Any) -> Self {
        Self {
            packs_children: false,
            state: Box::new(state),
        }
    }

    /// Handle whose group children are packed.
    pub fn packed(state: impl Any) -> Self {
        Self {
            packs_children: true,
            state: Box::new(state),
        }
    }

    /// Typed view of the state.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.state.downcast_ref()
    }

    /// Mutable typed view of the state.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.state.downcast_mut()
    }
}

impl fmt::Debug for BackendHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendHandle")
            .field("packs_children", &self.packs_children)
            .finish_non_exhaustive()
    }
}

/// Interface a rendering surface implements.
pub trait Backend {
    /// Allocate storage for a new node. `None` means the backend keeps nothing
    /// per node.
    fn create_handle(
        &mut self,
        node: NodeId,
        kind: ShapeKind,
        attr: &Attrs,
        style: &Styles,
    ) -> Option<BackendHandle>;

    /// An attribute was written (`AttrValue::Null` for a deletion).
    fn on_attr_change(
        &mut self,
        _node: NodeId,
        _handle: Option<&mut BackendHandle>,
        _key: &str,
        _value: &AttrValue,
    ) {
    }

    /// A style entry was written, already normalized.
    fn on_style_change(
        &mut self,
        _node: NodeId,
        _handle: Option<&mut BackendHandle>,
        _key: &str,
        _value: &StyleValue,
    ) {
    }

    /// A node left the tree; its handle is returned for release.
    fn on_remove(&mut self, _node: NodeId, _handle: Option<BackendHandle>) {}

    /// Draw the tree rooted at `root`. Called after reindexing and the
    /// bounding-box pass.
    fn execute(&mut self, tree: &NodeTree, root: NodeId) -> CanopyResult<()>;
}

/// Caller-owned cache of decoded image sources keyed by source string.
#[derive(Debug)]
pub struct TextureCache<T> {
    entries: HashMap<String, T>,
    hits: u64,
    misses: u64,
}

impl<T> Default for TextureCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<T> TextureCache<T> {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached entry for `src`, loading it on a miss. A failed load is not cached.
    pub fn get_or_load(
        &mut self,
        src: &str,
        load: impl FnOnce(&str) -> CanopyResult<T>,
    ) -> CanopyResult<&T> {
        match self.entries.entry(src.to_owned()) {
            Entry::Occupied(e) => {
                self.hits += 1;
                Ok(e.into_mut())
            }
            Entry::Vacant(e) => {
                self.misses += 1;
                let value = load(src)?;
                tracing::debug!(src, "texture cached");
                Ok(e.insert(value))
            }
        }
    }

    /// Cached entry without loading.
    pub fn get(&self, src: &str) -> Option<&T> {
        self.entries.get(src)
    }

    /// Drop one entry.
    pub fn evict(&mut self, src: &str) -> Option<T> {
        self.entries.remove(src)
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/mod.rs"]
mod tests;
