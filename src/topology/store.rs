//! Topology store.
//!
//! The authoritative node/link graph and its mutation API. Nodes live in an
//! id-indexed map with a separate insertion order, which is also paint order.
//! Links keep insertion order (the simulation picks links by index).
//! Lookups for unknown ids are no-ops rather than errors.

use std::collections::BTreeMap;

use log::{debug, warn};

use super::types::{Link, Node, Point, Selection, TopologyError, TopologySummary};

/// Node/link graph with a single active selection
#[derive(Debug, Clone, Default)]
pub struct TopologyStore {
    nodes: BTreeMap<String, Node>,
    /// Node ids in insertion order
    order: Vec<String>,
    links: Vec<Link>,
    selection: Selection,
}

impl TopologyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from nodes and links, validating ids and endpoints.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        links: impl IntoIterator<Item = Link>,
    ) -> Result<Self, TopologyError> {
        let mut store = Self::new();
        for node in nodes {
            store.add_node(node)?;
        }
        for link in links {
            store.add_link(link)?;
        }
        Ok(store)
    }

    // Node operations

    /// Insert a node. A node with the same id is never overwritten.
    pub fn add_node(&mut self, node: Node) -> Result<(), TopologyError> {
        if self.nodes.contains_key(&node.id) {
            warn!("Rejected duplicate node id {}", node.id);
            return Err(TopologyError::DuplicateNode(node.id));
        }
        debug!("Adding {} node {} ({})", node.kind, node.id, node.name);
        self.order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Replace the node stored under `id`.
    ///
    /// The id is immutable: whatever `node.id` says, the node stays under
    /// `id`. Links hold ids, so every attached link sees the new node on its
    /// next read.
    pub fn update_node(&mut self, id: &str, mut node: Node) {
        let Some(slot) = self.nodes.get_mut(id) else {
            debug!("update_node: unknown node {}", id);
            return;
        };
        if node.id != id {
            warn!("Ignoring id change {} -> {} on node update", id, node.id);
            node.id = id.to_string();
        }
        *slot = node;
    }

    /// Remove a node and every link attached to it.
    pub fn remove_node(&mut self, id: &str) {
        if self.nodes.remove(id).is_none() {
            debug!("remove_node: unknown node {}", id);
            return;
        }
        self.order.retain(|n| n != id);

        let before = self.links.len();
        self.links.retain(|link| !link.touches(id));
        debug!("Removed node {} and {} attached links", id, before - self.links.len());

        let selection_dangles = match &self.selection {
            Selection::Node(selected) => selected == id,
            Selection::Link(selected) => !self.links.iter().any(|l| &l.id == selected),
            Selection::None => false,
        };
        if selection_dangles {
            self.selection = Selection::None;
        }
    }

    /// Move a node. Identity and every other field stay untouched.
    pub fn update_node_position(&mut self, id: &str, x: f64, y: f64) {
        match self.nodes.get_mut(id) {
            Some(node) => node.position = Point::new(x, y),
            None => debug!("update_node_position: unknown node {}", id),
        }
    }

    /// Select a node (or clear with `None`). Any link selection is dropped.
    pub fn select_node(&mut self, id: Option<&str>) {
        match id {
            Some(id) if !self.nodes.contains_key(id) => {
                debug!("select_node: unknown node {}", id);
            }
            Some(id) => self.selection = Selection::Node(id.to_string()),
            None => self.selection = Selection::None,
        }
    }

    // Link operations

    /// Insert a link whose endpoints both resolve to current nodes.
    pub fn add_link(&mut self, link: Link) -> Result<(), TopologyError> {
        if self.links.iter().any(|l| l.id == link.id) {
            warn!("Rejected duplicate link id {}", link.id);
            return Err(TopologyError::DuplicateLink(link.id));
        }
        self.check_endpoints(&link)?;
        debug!("Adding {} link {} ({} -> {})", link.kind, link.id, link.source, link.target);
        self.links.push(link);
        Ok(())
    }

    /// Replace the link stored under `id`. Unknown ids are a no-op; endpoints
    /// that do not resolve are rejected and leave the link unchanged.
    pub fn update_link(&mut self, id: &str, mut link: Link) -> Result<(), TopologyError> {
        let Some(index) = self.links.iter().position(|l| l.id == id) else {
            debug!("update_link: unknown link {}", id);
            return Ok(());
        };
        if link.id != id {
            warn!("Ignoring id change {} -> {} on link update", id, link.id);
            link.id = id.to_string();
        }
        self.check_endpoints(&link)?;
        self.links[index] = link;
        Ok(())
    }

    pub fn remove_link(&mut self, id: &str) {
        let before = self.links.len();
        self.links.retain(|l| l.id != id);
        if self.links.len() == before {
            debug!("remove_link: unknown link {}", id);
            return;
        }
        if self.selection.link_id() == Some(id) {
            self.selection = Selection::None;
        }
    }

    /// Select a link (or clear with `None`). Any node selection is dropped.
    pub fn select_link(&mut self, id: Option<&str>) {
        match id {
            Some(id) if self.link(id).is_none() => {
                debug!("select_link: unknown link {}", id);
            }
            Some(id) => self.selection = Selection::Link(id.to_string()),
            None => self.selection = Selection::None,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    fn check_endpoints(&self, link: &Link) -> Result<(), TopologyError> {
        for endpoint in [&link.source, &link.target] {
            if !self.nodes.contains_key(endpoint) {
                warn!("Rejected link {}: unknown endpoint {}", link.id, endpoint);
                return Err(TopologyError::UnknownEndpoint {
                    link: link.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
        Ok(())
    }

    // Read access

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in insertion order, oldest first
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    /// Links in insertion order
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Links with `node_id` as either endpoint
    pub fn links_for_node<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |l| l.touches(node_id))
    }

    /// Resolve a link's endpoints to the current node values.
    pub fn link_endpoints(&self, link: &Link) -> Option<(&Node, &Node)> {
        Some((self.nodes.get(&link.source)?, self.nodes.get(&link.target)?))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selection.node_id().and_then(|id| self.node(id))
    }

    pub fn selected_link(&self) -> Option<&Link> {
        self.selection.link_id().and_then(|id| self.link(id))
    }

    pub fn summary(&self) -> TopologySummary {
        let mut summary = TopologySummary {
            nodes: self.nodes.len(),
            links: self.links.len(),
            ..TopologySummary::default()
        };
        for node in self.nodes.values() {
            *summary.nodes_by_kind.entry(node.kind).or_insert(0) += 1;
        }
        for link in &self.links {
            *summary.links_by_kind.entry(link.kind).or_insert(0) += 1;
        }
        summary
    }
}
