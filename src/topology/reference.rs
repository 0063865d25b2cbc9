//! Starter network shown when the editor opens: three sites and a cloud
//! endpoint hanging off one edge router, plus a direct underlay between HQ
//! and the first branch.

use super::store::TopologyStore;
use super::types::{Link, LinkKind, LinkProperties, Node, NodeKind, Point, TopologyError};

pub fn reference_nodes() -> Vec<Node> {
    vec![
        Node::new("site-1", NodeKind::Site, "HQ", Point::new(300.0, 200.0))
            .with_property("bandwidth", 1000)
            .with_property("location", "New York"),
        Node::new("site-2", NodeKind::Site, "Branch 1", Point::new(500.0, 300.0))
            .with_property("bandwidth", 500)
            .with_property("location", "Los Angeles"),
        Node::new("site-3", NodeKind::Site, "Branch 2", Point::new(400.0, 400.0))
            .with_property("bandwidth", 500)
            .with_property("location", "Chicago"),
        Node::new("router-1", NodeKind::Router, "Edge Router 1", Point::new(200.0, 300.0))
            .with_property("model", "vEdge 2000")
            .with_property("capacity", 5000),
        Node::new("cloud-1", NodeKind::Cloud, "Cloud Services", Point::new(600.0, 200.0))
            .with_property("provider", "aws")
            .with_property("region", "us-east-1"),
    ]
}

pub fn reference_links() -> Vec<Link> {
    vec![
        Link::new("link-1", "site-1", "router-1", LinkKind::Overlay)
            .with_properties(LinkProperties::metrics(1000.0, 10.0, 0.1, 2.0, 10.0)),
        Link::new("link-2", "site-2", "router-1", LinkKind::Overlay)
            .with_properties(LinkProperties::metrics(500.0, 20.0, 0.2, 5.0, 20.0)),
        Link::new("link-3", "site-3", "router-1", LinkKind::Overlay)
            .with_properties(LinkProperties::metrics(500.0, 15.0, 0.3, 3.0, 15.0)),
        Link::new("link-4", "router-1", "cloud-1", LinkKind::Overlay)
            .with_properties(LinkProperties::metrics(1000.0, 5.0, 0.1, 1.0, 5.0)),
        Link::new("link-5", "site-1", "site-2", LinkKind::Underlay)
            .with_properties(LinkProperties::metrics(500.0, 30.0, 0.5, 10.0, 30.0)),
    ]
}

/// The 5-node/5-link reference topology as a fresh store.
pub fn reference_topology() -> Result<TopologyStore, TopologyError> {
    TopologyStore::from_parts(reference_nodes(), reference_links())
}
