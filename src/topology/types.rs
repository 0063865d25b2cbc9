//! Topology type definitions.
//!
//! Nodes, links and the small value types shared by the store, the
//! simulation engine and the canvas. Links refer to their endpoints by node
//! id; the store resolves them on every read.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open, kind-specific attribute mapping carried by nodes and links.
pub type Properties = BTreeMap<String, Value>;

/// A point in topology (untransformed canvas) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Shortest distance from `self` to the segment `a`-`b`.
    pub fn distance_to_segment(self, a: Point, b: Point) -> f64 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.distance(a);
        }
        let t = (((self.x - a.x) * dx + (self.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
        self.distance(a.lerp(b, t))
    }
}

/// Topology vertex classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Customer site (HQ, branch office)
    Site,
    /// Edge or core router
    Router,
    /// Cloud service endpoint
    Cloud,
}

impl NodeKind {
    /// Capitalised label used for generated node names.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Site => "Site",
            Self::Router => "Router",
            Self::Cloud => "Cloud",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Site => "site",
            Self::Router => "router",
            Self::Cloud => "cloud",
        };
        f.write_str(name)
    }
}

/// Default site bandwidth capacity in Mbps
pub const DEFAULT_SITE_BANDWIDTH: f64 = 100.0;
/// Default router processing capacity in packets per second
pub const DEFAULT_ROUTER_CAPACITY: f64 = 10_000.0;
/// Default cloud provider
pub const DEFAULT_CLOUD_PROVIDER: &str = "aws";

/// A topology vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    pub position: Point,
    #[serde(default)]
    pub properties: Properties,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, name: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            position,
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Numeric property lookup. Editors may store numbers as text, so numeric
    /// strings are accepted too.
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        match self.properties.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Site bandwidth capacity in Mbps.
    pub fn bandwidth(&self) -> f64 {
        self.property_f64("bandwidth").unwrap_or(DEFAULT_SITE_BANDWIDTH)
    }

    /// Router processing capacity in packets per second.
    pub fn capacity(&self) -> f64 {
        self.property_f64("capacity").unwrap_or(DEFAULT_ROUTER_CAPACITY)
    }

    /// Cloud provider identifier (`aws`, `azure`, `gcp`).
    pub fn provider(&self) -> &str {
        self.property_str("provider").unwrap_or(DEFAULT_CLOUD_PROVIDER)
    }

    pub fn location(&self) -> Option<&str> {
        self.property_str("location")
    }

    pub fn region(&self) -> Option<&str> {
        self.property_str("region")
    }

    pub fn model(&self) -> Option<&str> {
        self.property_str("model")
    }
}

/// Link classification. Affects styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Overlay,
    Underlay,
    Mpls,
    Internet,
    Lte,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Overlay => "overlay",
            Self::Underlay => "underlay",
            Self::Mpls => "mpls",
            Self::Internet => "internet",
            Self::Lte => "lte",
        };
        f.write_str(name)
    }
}

/// Transport characteristics of a link. Every metric is optional; the
/// accessors fall back to the editor defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jitter: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(flatten)]
    pub extra: Properties,
}

impl LinkProperties {
    pub const DEFAULT_BANDWIDTH: f64 = 100.0;
    pub const DEFAULT_LATENCY: f64 = 20.0;
    pub const DEFAULT_PACKET_LOSS: f64 = 0.0;
    pub const DEFAULT_JITTER: f64 = 0.0;
    pub const DEFAULT_COST: f64 = 10.0;

    /// All five metrics set explicitly.
    pub fn metrics(bandwidth: f64, latency: f64, packet_loss: f64, jitter: f64, cost: f64) -> Self {
        Self {
            bandwidth: Some(bandwidth),
            latency: Some(latency),
            packet_loss: Some(packet_loss),
            jitter: Some(jitter),
            cost: Some(cost),
            extra: Properties::new(),
        }
    }

    /// Bandwidth in Mbps
    pub fn effective_bandwidth(&self) -> f64 {
        self.bandwidth.unwrap_or(Self::DEFAULT_BANDWIDTH)
    }

    /// Latency in milliseconds
    pub fn effective_latency(&self) -> f64 {
        self.latency.unwrap_or(Self::DEFAULT_LATENCY)
    }

    /// Packet loss percentage
    pub fn effective_packet_loss(&self) -> f64 {
        self.packet_loss.unwrap_or(Self::DEFAULT_PACKET_LOSS)
    }

    /// Jitter in milliseconds
    pub fn effective_jitter(&self) -> f64 {
        self.jitter.unwrap_or(Self::DEFAULT_JITTER)
    }

    pub fn effective_cost(&self) -> f64 {
        self.cost.unwrap_or(Self::DEFAULT_COST)
    }
}

/// An edge between two nodes, referenced by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: LinkKind,
    #[serde(default)]
    pub properties: LinkProperties,
}

impl Link {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        kind: LinkKind,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind,
            properties: LinkProperties::default(),
        }
    }

    pub fn with_properties(mut self, properties: LinkProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Returns true if either endpoint is `node_id`
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Current selection. Holding a single enum makes node and link selection
/// mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Node(String),
    Link(String),
}

impl Selection {
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Self::Node(id) => Some(id),
            _ => None,
        }
    }

    pub fn link_id(&self) -> Option<&str> {
        match self {
            Self::Link(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Read-only counts for the metrics panel.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TopologySummary {
    pub nodes: usize,
    pub links: usize,
    pub nodes_by_kind: BTreeMap<NodeKind, usize>,
    pub links_by_kind: BTreeMap<LinkKind, usize>,
}

/// Rejected topology mutations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TopologyError {
    #[error("Node {0} already exists")]
    DuplicateNode(String),

    #[error("Link {0} already exists")]
    DuplicateLink(String),

    #[error("Link {link} references unknown node {node}")]
    UnknownEndpoint { link: String, node: String },
}
