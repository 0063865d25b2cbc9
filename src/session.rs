//! Editor session.
//!
//! This module coordinates the topology store, the simulation engine and
//! the canvas on a single thread. Input events and timer polls are handled
//! one at a time, so a tick always reads a fully committed topology.

use std::time::Instant;

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config::Config;
use crate::render::{Canvas, Interaction, Scene};
use crate::simulation::{
    RoutingAlgorithm, ScenarioOutcome, SimulationEngine, SimulationSnapshot, TickReport,
    TrafficPattern,
};
use crate::topology::{NodeFactory, NodeKind, Point, Selection, TopologyStore, TopologySummary};

/// Everything the UI can ask the session to do
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    Click(Point),
    DoubleClick(Point),
    Wheel { at: Point, delta_y: f64 },
    /// Toolbar button for a new node of the given kind
    AddNode(NodeKind),
    BeginConnect,
    CancelConnect,
    /// Delete whatever is selected
    DeleteSelection,
    Start,
    Pause,
    Step,
    SetSpeed(u8),
    SetTrafficPattern(TrafficPattern),
    SetPacketSize(u32),
    SetPacketRate(u32),
    SetRoutingAlgorithm(RoutingAlgorithm),
    SetFecEnabled(bool),
    LoadScenario(String),
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Canvas(Interaction),
    NodeAdded(String),
    Deleted(Selection),
    Stepped(Option<TickReport>),
    Scenario(ScenarioOutcome),
    Updated,
}

/// Combined read-only snapshot for the metrics panel
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub topology: TopologySummary,
    pub simulation: SimulationSnapshot,
}

pub struct Session {
    store: TopologyStore,
    engine: SimulationEngine,
    canvas: Canvas,
    factory: NodeFactory,
    layout_rng: ChaCha8Rng,
    last_pump: Option<Instant>,
}

impl Session {
    pub fn new(config: &Config, store: TopologyStore) -> Self {
        let settings = config.simulation.settings.clone();
        let interval = config.simulation.tick_interval;
        let (engine, layout_rng) = match config.simulation.seed {
            Some(seed) => (
                SimulationEngine::seeded(settings, interval, seed),
                ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (SimulationEngine::new(settings, interval), ChaCha8Rng::from_entropy()),
        };

        info!(
            "Session opened with {} nodes and {} links",
            store.node_count(),
            store.link_count()
        );

        Self {
            store,
            engine,
            canvas: Canvas::new(&config.canvas),
            factory: NodeFactory::new(),
            layout_rng,
            last_pump: None,
        }
    }

    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    /// Direct store access for property editors
    pub fn store_mut(&mut self) -> &mut TopologyStore {
        &mut self.store
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Dispatch one input event.
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> EventOutcome {
        debug!("Event: {:?}", event);
        match event {
            InputEvent::PointerDown(at) => EventOutcome::Canvas(self.canvas.pointer_down(at, &self.store)),
            InputEvent::PointerMove(at) => EventOutcome::Canvas(self.canvas.pointer_move(at)),
            InputEvent::PointerUp(_) => EventOutcome::Canvas(self.canvas.pointer_up(&mut self.store)),
            InputEvent::Click(at) => {
                EventOutcome::Canvas(self.canvas.click(at, &mut self.store, &mut self.factory))
            }
            InputEvent::DoubleClick(at) => {
                EventOutcome::Canvas(self.canvas.double_click(at, &mut self.store, &mut self.factory))
            }
            InputEvent::Wheel { at, delta_y } => EventOutcome::Canvas(self.canvas.wheel(at, delta_y)),
            InputEvent::AddNode(kind) => {
                let node = self.factory.toolbar_node(&self.store, kind, &mut self.layout_rng);
                let id = node.id.clone();
                match self.store.add_node(node) {
                    Ok(()) => EventOutcome::NodeAdded(id),
                    Err(_) => EventOutcome::Updated,
                }
            }
            InputEvent::BeginConnect => {
                self.canvas.begin_connect();
                EventOutcome::Updated
            }
            InputEvent::CancelConnect => {
                self.canvas.cancel_connect();
                EventOutcome::Updated
            }
            InputEvent::DeleteSelection => {
                let selection = self.store.selection().clone();
                match &selection {
                    Selection::Node(id) => self.store.remove_node(id),
                    Selection::Link(id) => self.store.remove_link(id),
                    Selection::None => {}
                }
                EventOutcome::Deleted(selection)
            }
            InputEvent::Start => {
                self.engine.start(now);
                EventOutcome::Updated
            }
            InputEvent::Pause => {
                self.engine.pause();
                EventOutcome::Updated
            }
            InputEvent::Step => EventOutcome::Stepped(self.engine.step(&self.store)),
            InputEvent::SetSpeed(speed) => {
                self.engine.set_speed(speed);
                EventOutcome::Updated
            }
            InputEvent::SetTrafficPattern(pattern) => {
                self.engine.set_traffic_pattern(pattern);
                EventOutcome::Updated
            }
            InputEvent::SetPacketSize(size) => {
                self.engine.set_packet_size(size);
                EventOutcome::Updated
            }
            InputEvent::SetPacketRate(rate) => {
                self.engine.set_packet_rate(rate);
                EventOutcome::Updated
            }
            InputEvent::SetRoutingAlgorithm(algorithm) => {
                self.engine.set_routing_algorithm(algorithm);
                EventOutcome::Updated
            }
            InputEvent::SetFecEnabled(enabled) => {
                self.engine.set_fec_enabled(enabled);
                EventOutcome::Updated
            }
            InputEvent::LoadScenario(id) => EventOutcome::Scenario(self.engine.load_scenario(&id)),
        }
    }

    /// Timer callback: run due ticks, start the initial fit, animate the view.
    /// Returns the number of simulation ticks run.
    pub fn pump(&mut self, now: Instant) -> u32 {
        let ticks = self.engine.poll(now, &self.store);

        self.canvas.auto_fit(&self.store, self.engine.is_running());
        let dt = self
            .last_pump
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.canvas.advance(dt);
        self.last_pump = Some(now);

        ticks
    }

    pub fn render(&self) -> Scene {
        self.canvas.render(&self.store, self.engine.packets())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            topology: self.store.summary(),
            simulation: self.engine.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::RunState;
    use crate::topology::reference_topology;
    use std::time::Duration;

    fn session() -> Session {
        let mut config = Config::default();
        config.simulation.seed = Some(1);
        Session::new(&config, reference_topology().unwrap())
    }

    #[test]
    fn test_running_session_ticks_on_pump() {
        let mut session = session();
        let t0 = Instant::now();
        session.handle(InputEvent::Start, t0);
        assert_eq!(session.pump(t0 + Duration::from_millis(300)), 3);
        assert_eq!(session.engine().packets().len(), 15);
        assert!(!session.canvas().is_fitted());

        session.handle(InputEvent::Pause, t0 + Duration::from_millis(300));
        assert_eq!(session.pump(t0 + Duration::from_secs(2)), 0);
        assert!(session.canvas().is_fitted());
    }

    #[test]
    fn test_delete_selection() {
        let mut session = session();
        let now = Instant::now();
        session.store_mut().select_node(Some("router-1"));
        let outcome = session.handle(InputEvent::DeleteSelection, now);
        assert_eq!(outcome, EventOutcome::Deleted(Selection::Node("router-1".to_string())));
        assert_eq!(session.store().link_count(), 1);
        assert!(session.store().selection().is_none());
    }

    #[test]
    fn test_toolbar_add_and_settings() {
        let mut session = session();
        let now = Instant::now();
        let outcome = session.handle(InputEvent::AddNode(NodeKind::Cloud), now);
        let EventOutcome::NodeAdded(id) = outcome else { panic!("expected a node") };
        assert_eq!(session.store().node(&id).unwrap().name, "New Cloud");

        session.handle(InputEvent::SetSpeed(4), now);
        session.handle(InputEvent::SetFecEnabled(true), now);
        session.handle(InputEvent::SetRoutingAlgorithm(RoutingAlgorithm::LoadBalance), now);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.simulation.settings.speed, 4);
        assert!(snapshot.simulation.settings.fec_enabled);
        assert_eq!(snapshot.simulation.run_state, RunState::Stopped);
        assert_eq!(snapshot.topology.nodes, 6);
    }

    #[test]
    fn test_step_only_while_stopped() {
        let mut session = session();
        let now = Instant::now();
        assert!(matches!(session.handle(InputEvent::Step, now), EventOutcome::Stepped(Some(_))));
        session.handle(InputEvent::Start, now);
        assert_eq!(session.handle(InputEvent::Step, now), EventOutcome::Stepped(None));
    }

    #[test]
    fn test_scenario_leaves_state_alone() {
        let mut session = session();
        let now = Instant::now();
        let outcome = session.handle(InputEvent::LoadScenario("link-failure".to_string()), now);
        assert!(matches!(outcome, EventOutcome::Scenario(ScenarioOutcome::Acknowledged(_))));
        let outcome = session.handle(InputEvent::LoadScenario("bogus".to_string()), now);
        assert!(matches!(outcome, EventOutcome::Scenario(ScenarioOutcome::Unknown(_))));
        assert_eq!(session.store().link_count(), 5);
        assert!(session.engine().packets().is_empty());
    }
}
