//! Shared test utilities for the picture-atom test suite.
//!
//! Provides an in-memory document tree, a recording intersection observer,
//! and shortcuts for connecting a component with stock configuration.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut tree = TreeArena::default();
//! let host = tree.add_node(None);
//! let component = tree.add_node(Some(host));
//!
//! let observer = RecordingObserver::default();
//! let picture = connect_with(attrs, Some(300), observer.clone());
//! assert_eq!(observer.observing(), 1);
//! ```

use std::cell::Cell;
use std::rc::Rc;

use crate::attributes::Attributes;
use crate::component::{HostElement, Picture};
use crate::config::PictureConfig;
use crate::gate::IntersectionObserver;
use crate::hover::{DocumentTree, NodeId};
use crate::styles::FsStylesheets;

// =========================================================================
// Document tree
// =========================================================================

#[derive(Debug, Default, Clone)]
struct ArenaNode {
    parent: Option<NodeId>,
    shadow_host: Option<NodeId>,
    owns_scope: bool,
}

/// Flat arena of nodes. Ids are indices, handed out in insertion order.
#[derive(Debug, Default, Clone)]
pub struct TreeArena {
    nodes: Vec<ArenaNode>,
}

impl TreeArena {
    pub fn add_node(&mut self, parent: Option<NodeId>) -> NodeId {
        self.push(ArenaNode {
            parent,
            ..Default::default()
        })
    }

    /// A shadow root attached to `host`. It has no parent of its own.
    pub fn add_shadow_root(&mut self, host: NodeId) -> NodeId {
        self.push(ArenaNode {
            shadow_host: Some(host),
            ..Default::default()
        })
    }

    pub fn set_owns_scope(&mut self, node: NodeId) {
        self.node_mut(node).owns_scope = true;
    }

    fn push(&mut self, node: ArenaNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn node(&self, id: NodeId) -> &ArenaNode {
        self.nodes
            .get(id.0 as usize)
            .unwrap_or_else(|| panic!("node {id:?} not in arena of {}", self.nodes.len()))
    }

    fn node_mut(&mut self, id: NodeId) -> &mut ArenaNode {
        let len = self.nodes.len();
        self.nodes
            .get_mut(id.0 as usize)
            .unwrap_or_else(|| panic!("node {id:?} not in arena of {len}"))
    }
}

impl DocumentTree for TreeArena {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn shadow_host(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).shadow_host
    }

    fn owns_style_scope(&self, node: NodeId) -> bool {
        self.node(node).owns_scope
    }
}

// =========================================================================
// Intersection observer
// =========================================================================

/// Counts subscribe/unsubscribe calls. Clones share their counters, so a
/// test keeps one handle while the gate owns another.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    observed: Rc<Cell<u32>>,
    unobserved: Rc<Cell<u32>>,
}

impl RecordingObserver {
    /// Number of `observe` calls so far.
    pub fn observing(&self) -> u32 {
        self.observed.get()
    }

    /// Number of `unobserve` calls so far.
    pub fn unobserved(&self) -> u32 {
        self.unobserved.get()
    }
}

impl IntersectionObserver for RecordingObserver {
    fn observe(&mut self) {
        self.observed.set(self.observed.get() + 1);
    }

    fn unobserve(&mut self) {
        self.unobserved.set(self.unobserved.get() + 1);
    }
}

// =========================================================================
// Component shortcuts
// =========================================================================

/// Connect a detached component (id 1) with stock configuration.
pub fn connect(attributes: Attributes, natural_width: Option<u32>) -> Picture {
    connect_with(attributes, natural_width, RecordingObserver::default())
}

pub fn connect_with(
    attributes: Attributes,
    natural_width: Option<u32>,
    observer: RecordingObserver,
) -> Picture {
    Picture::connect(
        HostElement {
            id: NodeId(1),
            attributes,
            children: Vec::new(),
            natural_width,
        },
        &PictureConfig::default(),
        Box::new(observer),
        &FsStylesheets,
    )
}
