//! New node and link construction.
//!
//! Generates unique ids and default names for topology elements created
//! interactively (toolbar buttons, double-click, connect gesture).

use rand::Rng;

use super::store::TopologyStore;
use super::types::{Link, LinkKind, LinkProperties, Node, NodeKind, Point};

/// Where toolbar-added nodes are dropped before jitter
pub const TOOLBAR_CENTER: Point = Point::new(300.0, 300.0);
/// Maximum distance from the toolbar centre along each axis
pub const TOOLBAR_JITTER: f64 = 50.0;

/// Hands out `node-<n>` and `link-<n>` ids that are free in the store.
#[derive(Debug, Clone, Default)]
pub struct NodeFactory {
    next_node: u64,
    next_link: u64,
}

impl NodeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next node id not present in `store`
    pub fn node_id(&mut self, store: &TopologyStore) -> String {
        loop {
            self.next_node += 1;
            let id = format!("node-{}", self.next_node);
            if !store.contains_node(&id) {
                return id;
            }
        }
    }

    /// Next link id not present in `store`
    pub fn link_id(&mut self, store: &TopologyStore) -> String {
        loop {
            self.next_link += 1;
            let id = format!("link-{}", self.next_link);
            if store.link(&id).is_none() {
                return id;
            }
        }
    }

    /// A fresh node named `New <Kind>` with no properties.
    pub fn new_node(&mut self, store: &TopologyStore, kind: NodeKind, position: Point) -> Node {
        let id = self.node_id(store);
        Node::new(id, kind, default_name(kind), position)
    }

    /// A fresh node placed near [`TOOLBAR_CENTER`].
    pub fn toolbar_node<R: Rng + ?Sized>(
        &mut self,
        store: &TopologyStore,
        kind: NodeKind,
        rng: &mut R,
    ) -> Node {
        let position = Point::new(
            TOOLBAR_CENTER.x + rng.gen_range(-TOOLBAR_JITTER..TOOLBAR_JITTER),
            TOOLBAR_CENTER.y + rng.gen_range(-TOOLBAR_JITTER..TOOLBAR_JITTER),
        );
        self.new_node(store, kind, position)
    }

    /// A fresh link with every metric at its default.
    pub fn new_link(&mut self, store: &TopologyStore, source: &str, target: &str, kind: LinkKind) -> Link {
        let id = self.link_id(store);
        Link::new(id, source, target, kind).with_properties(LinkProperties::default())
    }
}

/// Default display name for a node of `kind`
pub fn default_name(kind: NodeKind) -> String {
    format!("New {}", kind.label())
}
