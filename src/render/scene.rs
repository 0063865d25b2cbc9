//! Scene construction.
//!
//! Projects the topology and the packet set into drawable shapes, layered
//! back to front as links, nodes, packets. Positions are in topology
//! coordinates; the scene carries the view transform separately.

use std::collections::HashMap;

use serde::Serialize;

use super::transform::{Bounds, Size, ZoomTransform};
use crate::simulation::{Packet, TrafficType};
use crate::topology::{LinkKind, Node, NodeKind, Point, TopologyStore};

pub const NODE_RADIUS: f64 = 20.0;
/// Baseline offset of the name label below the node centre
pub const LABEL_OFFSET: f64 = 35.0;
pub const PACKET_RADIUS: f64 = 4.0;

/// Transient drag positions keyed by node id
pub type DragPins = HashMap<String, Point>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
    /// 24x24 outline icon path
    pub icon: &'static str,
}

pub fn node_style(kind: NodeKind) -> NodeStyle {
    match kind {
        NodeKind::Site => NodeStyle {
            fill: "#DBEAFE",
            stroke: "#2563EB",
            icon: "M4 21V8a2 2 0 0 1 2-2h3m10 13V8a2 2 0 0 0-2-2h-3m-9 8h12",
        },
        NodeKind::Router => NodeStyle {
            fill: "#E0E7FF",
            stroke: "#4F46E5",
            icon: "M9 3H5a2 2 0 0 0-2 2v14a2 2 0 0 0 2 2h14a2 2 0 0 0 2-2v-4M13 15h8m-4-4v8",
        },
        NodeKind::Cloud => NodeStyle {
            fill: "#F3E8FF",
            stroke: "#8B5CF6",
            icon: "M17.5 19H9a7 7 0 1 1 6.71-9h1.79a4.5 4.5 0 1 1 0 9Z",
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkStyle {
    pub stroke: &'static str,
    pub width: u32,
    /// SVG dash pattern; solid when `None`
    pub dash: Option<&'static str>,
}

pub fn link_style(kind: LinkKind) -> LinkStyle {
    let stroke = match kind {
        LinkKind::Overlay => "#2563EB",
        LinkKind::Underlay => "#4B5563",
        LinkKind::Mpls => "#8B5CF6",
        LinkKind::Internet => "#10B981",
        LinkKind::Lte => "#F97316",
    };
    match kind {
        LinkKind::Overlay => LinkStyle { stroke, width: 3, dash: None },
        _ => LinkStyle { stroke, width: 2, dash: Some("5,5") },
    }
}

pub fn traffic_color(traffic: TrafficType) -> &'static str {
    match traffic {
        TrafficType::Voice => "#F97316",
        TrafficType::Video => "#EF4444",
        TrafficType::Data => "#3B82F6",
        TrafficType::Backup => "#8B5CF6",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkShape {
    pub id: String,
    pub from: Point,
    pub to: Point,
    pub style: LinkStyle,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeShape {
    pub id: String,
    pub center: Point,
    pub label: String,
    pub style: NodeStyle,
    pub selected: bool,
    pub dragging: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketShape {
    pub id: String,
    pub center: Point,
    pub color: &'static str,
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub size: Size,
    pub transform: ZoomTransform,
    pub links: Vec<LinkShape>,
    pub nodes: Vec<NodeShape>,
    pub packets: Vec<PacketShape>,
}

/// Where a node is drawn: its drag pin if it has one, else its committed position.
pub fn display_position(node: &Node, pins: &DragPins) -> Point {
    pins.get(&node.id).copied().unwrap_or(node.position)
}

/// Box covering a node's circle and its label
pub fn node_bounds(center: Point) -> Bounds {
    Bounds::new(
        Point::new(center.x - NODE_RADIUS, center.y - NODE_RADIUS),
        Point::new(center.x + NODE_RADIUS, center.y + LABEL_OFFSET),
    )
}

pub fn draw_links(store: &TopologyStore, pins: &DragPins) -> Vec<LinkShape> {
    let selected = store.selection().link_id();
    store
        .links()
        .iter()
        .filter_map(|link| {
            let (source, target) = store.link_endpoints(link)?;
            Some(LinkShape {
                id: link.id.clone(),
                from: display_position(source, pins),
                to: display_position(target, pins),
                style: link_style(link.kind),
                selected: selected == Some(link.id.as_str()),
            })
        })
        .collect()
}

pub fn draw_nodes(store: &TopologyStore, pins: &DragPins) -> Vec<NodeShape> {
    let selected = store.selection().node_id();
    store
        .nodes()
        .map(|node| NodeShape {
            id: node.id.clone(),
            center: display_position(node, pins),
            label: node.name.clone(),
            style: node_style(node.kind),
            selected: selected == Some(node.id.as_str()),
            dragging: pins.contains_key(&node.id),
        })
        .collect()
}

/// Packets interpolated along their links. Packets whose link is gone are skipped.
pub fn draw_packets(store: &TopologyStore, packets: &[Packet], pins: &DragPins) -> Vec<PacketShape> {
    packets
        .iter()
        .filter_map(|packet| {
            let link = store.link(&packet.link_id)?;
            let (source, target) = store.link_endpoints(link)?;
            let from = display_position(source, pins);
            let to = display_position(target, pins);
            Some(PacketShape {
                id: packet.id.clone(),
                center: from.lerp(to, packet.progress),
                color: traffic_color(packet.traffic_type),
            })
        })
        .collect()
}

pub fn draw_scene(
    store: &TopologyStore,
    packets: &[Packet],
    pins: &DragPins,
    transform: ZoomTransform,
    size: Size,
) -> Scene {
    Scene {
        size,
        transform,
        links: draw_links(store, pins),
        nodes: draw_nodes(store, pins),
        packets: draw_packets(store, packets, pins),
    }
}
