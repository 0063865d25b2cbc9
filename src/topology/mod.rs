//! Network topology module.
//!
//! This module contains the node/link graph model, the store that keeps it
//! consistent under interactive editing, and helpers for creating new
//! elements and the starter network.

pub mod types;
pub mod store;
pub mod factory;
pub mod reference;

// Re-export key types and functions for easier access
pub use types::{
    Link, LinkKind, LinkProperties, Node, NodeKind, Point, Properties, Selection, TopologyError,
    TopologySummary,
};
pub use store::TopologyStore;
pub use factory::{default_name, NodeFactory};
pub use reference::reference_topology;
