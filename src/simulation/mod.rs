//! Traffic simulation module.
//!
//! This module contains the packet animation engine, its tick scheduling,
//! and the scenario catalog.

pub mod types;
pub mod clock;
pub mod engine;
pub mod scenario;

// Re-export key types and functions for easier access
pub use types::{
    Packet, RoutingAlgorithm, RunState, SimulationSettings, SimulationSnapshot, TickKind,
    TickReport, TrafficPattern, TrafficType, MAX_PACKET_RATE, MAX_SPEED, MIN_SPEED,
};
pub use clock::{TickHandle, TickScheduler, DEFAULT_TICK_INTERVAL};
pub use engine::SimulationEngine;
pub use scenario::{load_scenario, Scenario, ScenarioOutcome, SCENARIOS};
