//! Synthetic window hierarchies.
//!
//! A [`WindowGraph`] is an immutable set of windows built with
//! [`WindowGraphBuilder`]. Each window may have a parent (a top-level window
//! is its own parent), an opener, and an `API` object; any of the three can
//! be marked cross-origin so reading it fails.
//!
//! ```text
//! builder.chain(3)        ids[0] ──parent──▶ ids[1] ──parent──▶ ids[2] ─┐
//!                                                               ▲       │
//!                                                               └───────┘
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use scorm_bridge_core::{WindowAccessError, WindowLike};

/// Index of a window in its graph.
pub type WindowId = usize;

#[derive(Debug, Clone)]
struct WindowNode<A> {
    parent: Option<WindowId>,
    parent_denied: bool,
    opener: Option<WindowId>,
    opener_denied: bool,
    api: Option<A>,
    api_denied: bool,
}

impl<A> WindowNode<A> {
    fn new(parent: Option<WindowId>) -> Self {
        Self {
            parent,
            parent_denied: false,
            opener: None,
            opener_denied: false,
            api: None,
            api_denied: false,
        }
    }
}

#[derive(Debug)]
struct GraphInner<A> {
    nodes: Vec<WindowNode<A>>,
    top_lookups: AtomicUsize,
    api_probes: AtomicUsize,
}

/// Builder for a [`WindowGraph`].
#[derive(Debug)]
pub struct WindowGraphBuilder<A> {
    nodes: Vec<WindowNode<A>>,
}

impl<A> Default for WindowGraphBuilder<A> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<A> WindowGraphBuilder<A> {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level window (its own parent).
    pub fn top_window(&mut self) -> WindowId {
        let id = self.nodes.len();
        self.nodes.push(WindowNode::new(Some(id)));
        id
    }

    /// Add a window framed inside `parent`.
    pub fn frame_in(&mut self, parent: WindowId) -> WindowId {
        self.nodes.push(WindowNode::new(Some(parent)));
        self.nodes.len() - 1
    }

    /// Add a window that exposes no parent at all.
    pub fn detached_window(&mut self) -> WindowId {
        self.nodes.push(WindowNode::new(None));
        self.nodes.len() - 1
    }

    /// Add `len` nested windows. `ids[0]` is innermost, `ids[len - 1]` is the
    /// top.
    pub fn chain(&mut self, len: usize) -> Vec<WindowId> {
        if len == 0 {
            return Vec::new();
        }

        let top = self.top_window();
        let mut ids = vec![top];
        for _ in 1..len {
            let parent = ids[ids.len() - 1];
            ids.push(self.frame_in(parent));
        }
        ids.reverse();
        ids
    }

    /// Place an `API` object on `window`.
    pub fn mount_api(&mut self, window: WindowId, api: A) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(window) {
            node.api = Some(api);
        }
        self
    }

    /// Point `window.parent` at `parent` (use `window` itself for a top).
    pub fn set_parent(&mut self, window: WindowId, parent: WindowId) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(window) {
            node.parent = Some(parent);
        }
        self
    }

    /// Record that `opener` opened `window`.
    pub fn set_opener(&mut self, window: WindowId, opener: WindowId) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(window) {
            node.opener = Some(opener);
        }
        self
    }

    /// Make reading `window.API` fail.
    pub fn deny_api(&mut self, window: WindowId) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(window) {
            node.api_denied = true;
        }
        self
    }

    /// Make reading `window.parent` fail.
    pub fn deny_parent(&mut self, window: WindowId) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(window) {
            node.parent_denied = true;
        }
        self
    }

    /// Make reading `window.opener` fail.
    pub fn deny_opener(&mut self, window: WindowId) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(window) {
            node.opener_denied = true;
        }
        self
    }

    /// Freeze the graph.
    pub fn build(self) -> WindowGraph<A> {
        WindowGraph {
            inner: Arc::new(GraphInner {
                nodes: self.nodes,
                top_lookups: AtomicUsize::new(0),
                api_probes: AtomicUsize::new(0),
            }),
        }
    }
}

/// An immutable window hierarchy with probe counters.
#[derive(Debug)]
pub struct WindowGraph<A> {
    inner: Arc<GraphInner<A>>,
}

impl<A> Clone for WindowGraph<A> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<A> WindowGraph<A> {
    /// Start building a graph.
    pub fn builder() -> WindowGraphBuilder<A> {
        WindowGraphBuilder::new()
    }

    /// Handle to a window.
    pub fn window(&self, id: WindowId) -> SimWindow<A> {
        SimWindow { graph: Arc::clone(&self.inner), id }
    }

    /// Number of `window.top` lookups. The locator does one per attempt.
    pub fn top_lookups(&self) -> usize {
        self.inner.top_lookups.load(Ordering::SeqCst)
    }

    /// Number of `window.API` reads.
    pub fn api_probes(&self) -> usize {
        self.inner.api_probes.load(Ordering::SeqCst)
    }
}

/// A window in a [`WindowGraph`].
#[derive(Debug)]
pub struct SimWindow<A> {
    graph: Arc<GraphInner<A>>,
    id: WindowId,
}

impl<A> Clone for SimWindow<A> {
    fn clone(&self) -> Self {
        Self { graph: Arc::clone(&self.graph), id: self.id }
    }
}

impl<A> SimWindow<A> {
    /// This window's id.
    pub fn id(&self) -> WindowId {
        self.id
    }

    fn node(&self) -> Option<&WindowNode<A>> {
        self.graph.nodes.get(self.id)
    }

    fn sibling(&self, id: WindowId) -> Self {
        Self { graph: Arc::clone(&self.graph), id }
    }
}

impl<A: Clone> WindowLike for SimWindow<A> {
    type Api = A;

    fn api(&self) -> Result<Option<A>, WindowAccessError> {
        self.graph.api_probes.fetch_add(1, Ordering::SeqCst);
        match self.node() {
            Some(node) if node.api_denied => Err(WindowAccessError::new("API is cross-origin")),
            Some(node) => Ok(node.api.clone()),
            None => Ok(None),
        }
    }

    fn parent(&self) -> Result<Option<Self>, WindowAccessError> {
        match self.node() {
            Some(node) if node.parent_denied => {
                Err(WindowAccessError::new("parent is cross-origin"))
            },
            Some(node) => Ok(node.parent.map(|id| self.sibling(id))),
            None => Ok(None),
        }
    }

    fn top(&self) -> Self {
        self.graph.top_lookups.fetch_add(1, Ordering::SeqCst);

        // Bounded so cyclic graphs still answer
        let mut current = self.id;
        for _ in 0..self.graph.nodes.len() {
            match self.graph.nodes.get(current).and_then(|node| node.parent) {
                Some(parent) if parent != current => current = parent,
                _ => break,
            }
        }
        self.sibling(current)
    }

    fn opener(&self) -> Result<Option<Self>, WindowAccessError> {
        match self.node() {
            Some(node) if node.opener_denied => {
                Err(WindowAccessError::new("opener is cross-origin"))
            },
            Some(node) => Ok(node.opener.map(|id| self.sibling(id))),
            None => Ok(None),
        }
    }

    fn is_same_window(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.graph, &other.graph) && self.id == other.id
    }
}
