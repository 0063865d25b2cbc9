//! Canvas interaction.
//!
//! Turns pointer gestures into topology mutations and keeps the transient
//! view state: the pan/zoom transform, drag pins, the current gesture and
//! the one-shot auto-fit. Screen coordinates come in; topology coordinates
//! go to the store.

use std::time::Duration;

use log::{debug, info};

use super::scene::{self, display_position, node_bounds, DragPins, Scene, NODE_RADIUS};
use super::transform::{fit_transform, Bounds, ScaleExtent, Size, ViewTransition, ZoomTransform};
use crate::config::CanvasConfig;
use crate::simulation::Packet;
use crate::topology::{Link, LinkKind, Node, NodeFactory, NodeKind, Point, TopologyStore};

/// Screen-space distance within which a click hits a link
pub const LINK_HIT_TOLERANCE: f64 = 6.0;
/// Kind of node created by double-clicking the background
pub const DEFAULT_NODE_KIND: NodeKind = NodeKind::Site;

/// Pointer gesture in progress. Dragging and panning never overlap.
#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    Panning { last: Point },
    Dragging { node_id: String, grab_offset: Point },
}

/// What a gesture did, for logging and callers that care
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Ignored,
    Panned,
    Zoomed,
    DragStarted(String),
    Dragged(String),
    NodeMoved { id: String, position: Point },
    NodeSelected(String),
    LinkSelected(String),
    SelectionCleared,
    NodeAdded(String),
    ConnectPending(String),
    LinkAdded(String),
}

#[derive(Debug, Clone)]
pub struct Canvas {
    size: Size,
    extent: ScaleExtent,
    fit_fill: f64,
    transition_duration: Duration,
    clear_selection_on_background: bool,
    transform: ZoomTransform,
    transition: Option<ViewTransition>,
    pins: DragPins,
    gesture: Gesture,
    /// `Some` while in connect mode; holds the first endpoint once picked
    connect: Option<Option<String>>,
    fitted: bool,
}

impl Canvas {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            size: Size::new(config.width, config.height),
            extent: ScaleExtent { min: config.min_scale, max: config.max_scale },
            fit_fill: config.fit_fill,
            transition_duration: config.transition,
            clear_selection_on_background: config.clear_selection_on_background,
            transform: ZoomTransform::IDENTITY,
            transition: None,
            pins: DragPins::new(),
            gesture: Gesture::Idle,
            connect: None,
            fitted: false,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    pub fn pins(&self) -> &DragPins {
        &self.pins
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn is_connecting(&self) -> bool {
        self.connect.is_some()
    }

    /// Screen point to topology point under the current transform
    pub fn to_topology(&self, screen: Point) -> Point {
        self.transform.invert(screen)
    }

    /// Topmost node under a screen point
    pub fn node_at<'a>(&self, store: &'a TopologyStore, screen: Point) -> Option<&'a Node> {
        let p = self.to_topology(screen);
        // Later nodes paint over earlier ones
        store
            .nodes()
            .filter(|node| display_position(node, &self.pins).distance(p) <= NODE_RADIUS)
            .last()
    }

    /// Topmost link under a screen point
    pub fn link_at<'a>(&self, store: &'a TopologyStore, screen: Point) -> Option<&'a Link> {
        let p = self.to_topology(screen);
        let tolerance = LINK_HIT_TOLERANCE / self.transform.k;
        store.links().iter().rev().find(|link| {
            store.link_endpoints(link).is_some_and(|(source, target)| {
                let a = display_position(source, &self.pins);
                let b = display_position(target, &self.pins);
                p.distance_to_segment(a, b) <= tolerance
            })
        })
    }

    // Pointer gestures

    /// Press: grab a node under the pointer, otherwise start panning.
    pub fn pointer_down(&mut self, screen: Point, store: &TopologyStore) -> Interaction {
        // Any manual gesture interrupts a running view transition
        self.transition = None;

        match self.node_at(store, screen) {
            Some(node) => {
                let grab = self.to_topology(screen);
                let offset = Point::new(grab.x - node.position.x, grab.y - node.position.y);
                self.pins.insert(node.id.clone(), node.position);
                self.gesture = Gesture::Dragging { node_id: node.id.clone(), grab_offset: offset };
                debug!("Drag started on {}", node.id);
                Interaction::DragStarted(node.id.clone())
            }
            None => {
                self.gesture = Gesture::Panning { last: screen };
                Interaction::Panned
            }
        }
    }

    /// Move: update the drag pin or pan the view.
    pub fn pointer_move(&mut self, screen: Point) -> Interaction {
        match &mut self.gesture {
            Gesture::Idle => Interaction::Ignored,
            Gesture::Panning { last } => {
                let (dx, dy) = (screen.x - last.x, screen.y - last.y);
                *last = screen;
                self.transform = self.transform.translate_by(dx, dy);
                Interaction::Panned
            }
            Gesture::Dragging { node_id, grab_offset } => {
                let p = self.transform.invert(screen);
                let pinned = Point::new(p.x - grab_offset.x, p.y - grab_offset.y);
                self.pins.insert(node_id.clone(), pinned);
                Interaction::Dragged(node_id.clone())
            }
        }
    }

    /// Release: commit a drag to the store and clear its pin.
    pub fn pointer_up(&mut self, store: &mut TopologyStore) -> Interaction {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Dragging { node_id, .. } => match self.pins.remove(&node_id) {
                Some(position) => {
                    store.update_node_position(&node_id, position.x, position.y);
                    debug!("Drag ended on {} at ({:.1}, {:.1})", node_id, position.x, position.y);
                    Interaction::NodeMoved { id: node_id, position }
                }
                None => Interaction::Ignored,
            },
            Gesture::Panning { .. } => Interaction::Panned,
            Gesture::Idle => Interaction::Ignored,
        }
    }

    /// Wheel: zoom about the pointer. Positive `delta_y` zooms out.
    pub fn wheel(&mut self, screen: Point, delta_y: f64) -> Interaction {
        self.transition = None;
        let factor = 2f64.powf(-delta_y * 0.002);
        self.transform = self.transform.zoom_about(screen, factor, self.extent);
        Interaction::Zoomed
    }

    /// Click: select (or connect) the node under the pointer, else a link,
    /// else the background.
    pub fn click(&mut self, screen: Point, store: &mut TopologyStore, factory: &mut NodeFactory) -> Interaction {
        if let Some(id) = self.node_at(store, screen).map(|n| n.id.clone()) {
            if self.connect.is_some() {
                return self.connect_to(id, store, factory);
            }
            store.select_node(Some(&id));
            return Interaction::NodeSelected(id);
        }

        if let Some(id) = self.link_at(store, screen).map(|l| l.id.clone()) {
            store.select_link(Some(&id));
            return Interaction::LinkSelected(id);
        }

        if self.clear_selection_on_background && !store.selection().is_none() {
            store.clear_selection();
            return Interaction::SelectionCleared;
        }
        Interaction::Ignored
    }

    /// Double-click on the background adds a node there. Double-clicks on
    /// nodes are swallowed.
    pub fn double_click(&mut self, screen: Point, store: &mut TopologyStore, factory: &mut NodeFactory) -> Interaction {
        if self.node_at(store, screen).is_some() {
            return Interaction::Ignored;
        }
        let position = self.to_topology(screen);
        let node = factory.new_node(store, DEFAULT_NODE_KIND, position);
        let id = node.id.clone();
        match store.add_node(node) {
            Ok(()) => {
                info!("Added {} at ({:.1}, {:.1})", id, position.x, position.y);
                Interaction::NodeAdded(id)
            }
            Err(_) => Interaction::Ignored,
        }
    }

    // Connect mode

    /// Enter connect mode; the next two distinct node clicks create a link.
    pub fn begin_connect(&mut self) {
        self.connect = Some(None);
    }

    pub fn cancel_connect(&mut self) {
        self.connect = None;
    }

    fn connect_to(&mut self, id: String, store: &mut TopologyStore, factory: &mut NodeFactory) -> Interaction {
        let first = match self.connect.take().flatten() {
            Some(first) if first != id && store.contains_node(&first) => first,
            // First pick, repeated pick, or the first endpoint vanished
            _ => {
                self.connect = Some(Some(id.clone()));
                return Interaction::ConnectPending(id);
            }
        };

        let link = factory.new_link(store, &first, &id, LinkKind::Overlay);
        let link_id = link.id.clone();
        match store.add_link(link) {
            Ok(()) => {
                info!("Connected {} -> {} with {}", first, id, link_id);
                Interaction::LinkAdded(link_id)
            }
            Err(_) => Interaction::Ignored,
        }
    }

    // View animation

    /// Start the one-time fit of all nodes into the viewport. Returns true
    /// when a fit was started.
    pub fn auto_fit(&mut self, store: &TopologyStore, running: bool) -> bool {
        if self.fitted || running {
            return false;
        }
        let Some(bounds) = Bounds::union_all(
            store.nodes().map(|node| node_bounds(display_position(node, &self.pins))),
        ) else {
            return false;
        };

        let target = fit_transform(bounds, self.size, self.fit_fill, self.extent);
        debug!("Auto-fit to {:?}", target);
        self.transition = Some(ViewTransition::new(self.transform, target, self.transition_duration));
        self.fitted = true;
        true
    }

    /// Advance any running view transition by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        if let Some(transition) = self.transition.as_mut() {
            self.transform = transition.advance(dt);
            if transition.is_finished() {
                self.transition = None;
            }
        }
    }

    pub fn render(&self, store: &TopologyStore, packets: &[Packet]) -> Scene {
        scene::draw_scene(store, packets, &self.pins, self.transform, self.size)
    }
}
