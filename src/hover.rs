//! Hover scope resolution.
//!
//! Hover listeners live on the component itself, its parent, or the nearest
//! ancestor that owns an encapsulated style scope. Finding the latter walks
//! parent links and crosses shadow boundaries through the host
//! back-reference; when nothing qualifies the top-most node reached is used.
//! The result is memoized per component and cleared on teardown.

use crate::types::HoverScope;

/// Node identifier in the host document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Read-only view of the host document tree.
pub trait DocumentTree {
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// For a shadow root, the element hosting it.
    fn shadow_host(&self, node: NodeId) -> Option<NodeId>;

    /// Whether the node hosts its own encapsulated style scope.
    fn owns_style_scope(&self, node: NodeId) -> bool;
}

/// Nearest node at or above `start` owning a style scope, or the top-most
/// node reached.
pub fn nearest_scope_host(tree: &dyn DocumentTree, start: NodeId) -> NodeId {
    let mut node = start;
    loop {
        if tree.owns_style_scope(node) {
            return node;
        }
        match tree.parent(node).or_else(|| tree.shadow_host(node)) {
            Some(next) => node = next,
            None => return node,
        }
    }
}

/// Memoized scope-host lookup for one component.
#[derive(Debug, Default)]
pub struct ScopeLookup {
    cached: Option<(NodeId, NodeId)>,
}

impl ScopeLookup {
    /// Scope host above `component`. Computed on first use.
    pub fn resolve(&mut self, tree: &dyn DocumentTree, component: NodeId) -> Option<NodeId> {
        if let Some((owner, host)) = self.cached
            && owner == component
        {
            return Some(host);
        }
        let parent = tree.parent(component)?;
        let host = nearest_scope_host(tree, parent);
        self.cached = Some((component, host));
        Some(host)
    }

    pub fn clear(&mut self) {
        self.cached = None;
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}

/// Element whose pointer events toggle the hover class.
pub fn hover_target(
    scope: HoverScope,
    tree: &dyn DocumentTree,
    component: NodeId,
    lookup: &mut ScopeLookup,
) -> Option<NodeId> {
    match scope {
        HoverScope::SelfElement => Some(component),
        HoverScope::Parent => tree.parent(component),
        HoverScope::ParentShadowHost => lookup.resolve(tree, component),
    }
}
