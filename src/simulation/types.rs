//! Simulation type definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Traffic class of a packet. Only affects rendering colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficType {
    Voice,
    Video,
    Data,
    Backup,
}

/// Traffic types chosen from when spawning packets
pub const SPAWNED_TRAFFIC: [TrafficType; 3] = [TrafficType::Voice, TrafficType::Video, TrafficType::Data];

/// Traffic pattern selector. Recorded only; spawning is uniform over links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrafficPattern {
    #[default]
    Uniform,
    HubSpoke,
    Custom,
}

/// Routing algorithm label. Recorded only; packets never change links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingAlgorithm {
    #[default]
    ShortestPath,
    LeastCost,
    LoadBalance,
    ApplicationAware,
}

/// An in-flight packet on one link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Packet {
    pub id: String,
    pub link_id: String,
    pub traffic_type: TrafficType,
    /// Size in bytes, copied from the packet-size setting at spawn time
    pub size: u32,
    /// Normalised position from source (0) to target (1), always below 1
    pub progress: f64,
}

/// Run state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 10;
/// Largest packet rate (packets per second) the engine accepts
pub const MAX_PACKET_RATE: u32 = 100;

/// Process-wide simulation knobs, each effective from the next tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Speed multiplier, 1 to 10
    pub speed: u8,
    pub traffic_pattern: TrafficPattern,
    /// Packet size in bytes
    pub packet_size: u32,
    /// Packets per second before the speed multiplier
    pub packet_rate: u32,
    pub routing_algorithm: RoutingAlgorithm,
    /// Forward error correction flag
    pub fec_enabled: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            speed: 1,
            traffic_pattern: TrafficPattern::Uniform,
            packet_size: 512,
            packet_rate: 50,
            routing_algorithm: RoutingAlgorithm::ShortestPath,
            fec_enabled: false,
        }
    }
}

/// Which kind of tick to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// Timer-driven tick while running
    Periodic,
    /// Manual single step while stopped
    Step,
}

/// Packets spawned by one manual step
pub const STEP_EMISSION: u32 = 5;
/// Progress added to each packet by one manual step
pub const STEP_ADVANCE: f64 = 0.1;
/// Progress added per periodic tick, per unit of speed
pub const TICK_ADVANCE_PER_SPEED: f64 = 0.05;

impl TickKind {
    /// Number of packets this tick tries to spawn
    pub fn emission(&self, settings: &SimulationSettings) -> u32 {
        match self {
            Self::Periodic => settings.packet_rate.saturating_mul(u32::from(settings.speed)) / 10,
            Self::Step => STEP_EMISSION,
        }
    }

    /// Progress delta applied to each existing packet
    pub fn advance(&self, settings: &SimulationSettings) -> f64 {
        match self {
            Self::Periodic => TICK_ADVANCE_PER_SPEED * f64::from(settings.speed),
            Self::Step => STEP_ADVANCE,
        }
    }
}

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TickReport {
    pub spawned: usize,
    pub completed: usize,
    /// Packets dropped because their link no longer exists
    pub orphaned: usize,
    pub in_flight: usize,
}

/// Read-only view of the engine for the metrics panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSnapshot {
    pub run_state: RunState,
    pub settings: SimulationSettings,
    pub ticks: u64,
    pub packets: usize,
    pub packets_by_traffic: BTreeMap<TrafficType, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periodic_emission_formula() {
        let settings = SimulationSettings { packet_rate: 50, speed: 2, ..Default::default() };
        assert_eq!(TickKind::Periodic.emission(&settings), 10);

        let settings = SimulationSettings { packet_rate: 7, speed: 1, ..Default::default() };
        assert_eq!(TickKind::Periodic.emission(&settings), 0);

        let settings = SimulationSettings { packet_rate: 0, speed: 10, ..Default::default() };
        assert_eq!(TickKind::Step.emission(&settings), STEP_EMISSION);
    }

    #[test]
    fn test_emission_saturates_on_huge_rate() {
        let settings = SimulationSettings { packet_rate: u32::MAX / 5, speed: 10, ..Default::default() };
        assert_eq!(TickKind::Periodic.emission(&settings), u32::MAX / 10);
    }

    #[test]
    fn test_advance_per_kind() {
        let settings = SimulationSettings { speed: 4, ..Default::default() };
        assert!((TickKind::Periodic.advance(&settings) - 0.2).abs() < 1e-12);
        assert_eq!(TickKind::Step.advance(&settings), STEP_ADVANCE);
    }

    #[test]
    fn test_settings_yaml_names() {
        let settings: SimulationSettings = serde_yaml::from_str(
            "traffic_pattern: hub-spoke\nrouting_algorithm: application-aware\nfec_enabled: true\n",
        )
        .unwrap();
        assert_eq!(settings.traffic_pattern, TrafficPattern::HubSpoke);
        assert_eq!(settings.routing_algorithm, RoutingAlgorithm::ApplicationAware);
        assert!(settings.fec_enabled);
        assert_eq!(settings.packet_size, 512);
    }
}
