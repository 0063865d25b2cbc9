//! Packet simulation engine.
//!
//! Owns the packet population and the run state. Each tick spawns packets
//! on randomly chosen links and moves every existing packet along its link.
//! The engine reads the topology and never mutates it.

use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::clock::{TickHandle, TickScheduler};
use super::scenario::{self, ScenarioOutcome};
use super::types::{
    Packet, RoutingAlgorithm, RunState, SimulationSettings, SimulationSnapshot, TickKind,
    TickReport, TrafficPattern, MAX_PACKET_RATE, MAX_SPEED, MIN_SPEED, SPAWNED_TRAFFIC,
};
use crate::topology::TopologyStore;

/// Time-driven packet population with run/pause/step control.
///
/// Generic over the random source so tests can inject a seeded one.
#[derive(Debug, Clone)]
pub struct SimulationEngine<R = ChaCha8Rng> {
    settings: SimulationSettings,
    packets: Vec<Packet>,
    scheduler: TickScheduler,
    rng: R,
    next_packet: u64,
    ticks: u64,
}

impl SimulationEngine<ChaCha8Rng> {
    /// Engine with an entropy-seeded random source
    pub fn new(settings: SimulationSettings, tick_interval: Duration) -> Self {
        Self::with_rng(settings, tick_interval, ChaCha8Rng::from_entropy())
    }

    /// Engine whose spawn sequence is fully determined by `seed`
    pub fn seeded(settings: SimulationSettings, tick_interval: Duration, seed: u64) -> Self {
        Self::with_rng(settings, tick_interval, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> SimulationEngine<R> {
    pub fn with_rng(mut settings: SimulationSettings, tick_interval: Duration, rng: R) -> Self {
        settings.speed = clamp_speed(settings.speed);
        settings.packet_rate = settings.packet_rate.min(MAX_PACKET_RATE);
        Self {
            settings,
            packets: Vec::new(),
            scheduler: TickScheduler::new(tick_interval),
            rng,
            next_packet: 0,
            ticks: 0,
        }
    }

    // Run control

    pub fn run_state(&self) -> RunState {
        if self.scheduler.is_scheduled() {
            RunState::Running
        } else {
            RunState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_scheduled()
    }

    /// Enter Running. Starting twice keeps the existing schedule.
    pub fn start(&mut self, now: Instant) -> TickHandle {
        if let Some(handle) = self.scheduler.handle() {
            debug!("Simulation already running");
            return handle;
        }
        info!(
            "Starting simulation (speed {}, rate {}, tick every {:?})",
            self.settings.speed,
            self.settings.packet_rate,
            self.scheduler.period()
        );
        self.scheduler.schedule(now)
    }

    /// Enter Stopped. No further periodic tick runs after this returns.
    pub fn pause(&mut self) -> bool {
        match self.scheduler.handle() {
            Some(handle) => {
                info!("Pausing simulation after {} ticks", self.ticks);
                self.scheduler.cancel(handle)
            }
            None => false,
        }
    }

    /// One manual tick. Only valid while stopped.
    pub fn step(&mut self, topology: &TopologyStore) -> Option<TickReport> {
        if self.is_running() {
            warn!("Ignoring step while the simulation is running");
            return None;
        }
        Some(self.tick(TickKind::Step, topology))
    }

    /// Run every periodic tick due at `now`. Returns the number of ticks run.
    pub fn poll(&mut self, now: Instant, topology: &TopologyStore) -> u32 {
        let due = self.scheduler.take_due(now);
        for _ in 0..due {
            self.tick(TickKind::Periodic, topology);
        }
        due
    }

    /// Spawn, advance and cull packets once.
    pub(crate) fn tick(&mut self, kind: TickKind, topology: &TopologyStore) -> TickReport {
        let links = topology.links();
        let emission = kind.emission(&self.settings);

        let mut spawned = Vec::with_capacity(emission as usize);
        if links.is_empty() {
            if emission > 0 {
                debug!("No links in topology; skipping spawn of {} packets", emission);
            }
        } else {
            for _ in 0..emission {
                let link = &links[self.rng.gen_range(0..links.len())];
                let traffic_type = SPAWNED_TRAFFIC[self.rng.gen_range(0..SPAWNED_TRAFFIC.len())];
                self.next_packet += 1;
                spawned.push(Packet {
                    id: format!("packet-{}", self.next_packet),
                    link_id: link.id.clone(),
                    traffic_type,
                    size: self.settings.packet_size,
                    progress: 0.0,
                });
            }
        }

        let live_links: HashSet<&str> = links.iter().map(|l| l.id.as_str()).collect();
        let delta = kind.advance(&self.settings);
        let mut report = TickReport { spawned: spawned.len(), ..TickReport::default() };

        let mut next = Vec::with_capacity(self.packets.len() + spawned.len());
        for mut packet in self.packets.drain(..) {
            if !live_links.contains(packet.link_id.as_str()) {
                report.orphaned += 1;
                continue;
            }
            packet.progress += delta;
            if packet.progress >= 1.0 {
                report.completed += 1;
                continue;
            }
            next.push(packet);
        }
        next.extend(spawned);
        self.packets = next;

        self.ticks += 1;
        report.in_flight = self.packets.len();
        debug!("{:?} tick {}: {:?}", kind, self.ticks, report);
        report
    }

    // Settings

    /// Set the speed multiplier, clamped to 1..=10
    pub fn set_speed(&mut self, speed: u8) {
        let clamped = clamp_speed(speed);
        if clamped != speed {
            warn!("Speed {} out of range; using {}", speed, clamped);
        }
        self.settings.speed = clamped;
    }

    pub fn set_traffic_pattern(&mut self, pattern: TrafficPattern) {
        self.settings.traffic_pattern = pattern;
    }

    pub fn set_packet_size(&mut self, size: u32) {
        self.settings.packet_size = size;
    }

    /// Set packets per second, capped at 100
    pub fn set_packet_rate(&mut self, rate: u32) {
        if rate > MAX_PACKET_RATE {
            warn!("Packet rate {} out of range; using {}", rate, MAX_PACKET_RATE);
        }
        self.settings.packet_rate = rate.min(MAX_PACKET_RATE);
    }

    pub fn set_routing_algorithm(&mut self, algorithm: RoutingAlgorithm) {
        self.settings.routing_algorithm = algorithm;
    }

    pub fn set_fec_enabled(&mut self, enabled: bool) {
        self.settings.fec_enabled = enabled;
    }

    /// Acknowledge a scenario. Packets and topology are left alone.
    pub fn load_scenario(&self, id: &str) -> ScenarioOutcome {
        scenario::load_scenario(id)
    }

    // Read access

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick_interval(&self) -> Duration {
        self.scheduler.period()
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        let mut packets_by_traffic = BTreeMap::new();
        for packet in &self.packets {
            *packets_by_traffic.entry(packet.traffic_type).or_insert(0) += 1;
        }
        SimulationSnapshot {
            run_state: self.run_state(),
            settings: self.settings.clone(),
            ticks: self.ticks,
            packets: self.packets.len(),
            packets_by_traffic,
        }
    }
}

fn clamp_speed(speed: u8) -> u8 {
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::clock::DEFAULT_TICK_INTERVAL;
    use crate::simulation::types::{TrafficType, STEP_EMISSION};
    use crate::topology::{reference_topology, Link, LinkKind, Node, NodeKind, Point};

    fn engine(settings: SimulationSettings) -> SimulationEngine {
        SimulationEngine::seeded(settings, DEFAULT_TICK_INTERVAL, 7)
    }

    #[test]
    fn test_periodic_tick_spawns_rate_times_speed() {
        let topology = reference_topology().unwrap();
        let mut sim = engine(SimulationSettings { packet_rate: 50, speed: 2, ..Default::default() });
        let report = sim.tick(TickKind::Periodic, &topology);
        assert_eq!(report.spawned, 10);
        assert_eq!(sim.packets().len(), 10);
        for packet in sim.packets() {
            assert_eq!(packet.progress, 0.0);
            assert_eq!(packet.size, 512);
            assert!(topology.link(&packet.link_id).is_some());
            assert_ne!(packet.traffic_type, TrafficType::Backup);
        }
    }

    #[test]
    fn test_step_ignores_rate() {
        let topology = reference_topology().unwrap();
        let mut sim = engine(SimulationSettings { packet_rate: 0, ..Default::default() });
        let report = sim.step(&topology).unwrap();
        assert_eq!(report.spawned, STEP_EMISSION as usize);
        assert_eq!(sim.packets().len(), 5);
    }

    #[test]
    fn test_step_advances_by_fixed_delta() {
        let topology = reference_topology().unwrap();
        let mut sim = engine(SimulationSettings { speed: 10, ..Default::default() });
        sim.step(&topology);
        sim.step(&topology);
        let oldest: Vec<_> = sim.packets()[..5].iter().map(|p| p.progress).collect();
        assert!(oldest.iter().all(|p| (p - 0.1).abs() < 1e-12));
        assert!(sim.packets()[5..].iter().all(|p| p.progress == 0.0));
    }

    #[test]
    fn test_progress_stays_below_one() {
        let topology = reference_topology().unwrap();
        let mut sim = engine(SimulationSettings { packet_rate: 30, speed: 7, ..Default::default() });
        let mut completed = 0;
        for _ in 0..40 {
            completed += sim.tick(TickKind::Periodic, &topology).completed;
            assert!(sim.packets().iter().all(|p| (0.0..1.0).contains(&p.progress)));
        }
        assert!(completed > 0);
    }

    #[test]
    fn test_empty_topology_spawns_nothing() {
        let topology = TopologyStore::new();
        let mut sim = engine(SimulationSettings::default());
        let start = Instant::now();
        sim.start(start);
        let ticks = sim.poll(start + Duration::from_millis(550), &topology);
        assert_eq!(ticks, 5);
        assert!(sim.packets().is_empty());
        assert_eq!(sim.step(&topology), None);
    }

    #[test]
    fn test_pause_stops_ticks() {
        let topology = reference_topology().unwrap();
        let mut sim = engine(SimulationSettings::default());
        let start = Instant::now();
        sim.start(start);
        assert_eq!(sim.run_state(), RunState::Running);
        assert_eq!(sim.poll(start + Duration::from_millis(200), &topology), 2);

        assert!(sim.pause());
        assert_eq!(sim.run_state(), RunState::Stopped);
        let before = sim.packets().to_vec();
        assert_eq!(sim.poll(start + Duration::from_secs(5), &topology), 0);
        assert_eq!(sim.packets(), before.as_slice());
        assert!(!sim.pause());
    }

    #[test]
    fn test_start_twice_keeps_schedule() {
        let mut sim = engine(SimulationSettings::default());
        let now = Instant::now();
        let first = sim.start(now);
        let second = sim.start(now + Duration::from_millis(30));
        assert_eq!(first, second);
    }

    #[test]
    fn test_orphaned_packets_are_dropped() {
        let mut topology = reference_topology().unwrap();
        let mut sim = engine(SimulationSettings::default());
        sim.step(&topology);
        let on_link_5 = sim.packets().iter().filter(|p| p.link_id == "link-5").count();

        topology.remove_link("link-5");
        let report = sim.step(&topology).unwrap();
        assert_eq!(report.orphaned, on_link_5);
        assert!(sim.packets().iter().all(|p| p.link_id != "link-5"));
    }

    #[test]
    fn test_setters_do_not_touch_packets() {
        let topology = reference_topology().unwrap();
        let mut sim = engine(SimulationSettings::default());
        sim.step(&topology);
        let before = sim.packets().to_vec();

        sim.set_speed(0);
        assert_eq!(sim.settings().speed, 1);
        sim.set_speed(42);
        assert_eq!(sim.settings().speed, 10);
        sim.set_packet_rate(99);
        sim.set_packet_size(1500);
        sim.set_traffic_pattern(TrafficPattern::HubSpoke);
        sim.set_routing_algorithm(RoutingAlgorithm::LeastCost);
        sim.set_fec_enabled(true);
        sim.load_scenario("ddos");
        sim.load_scenario("nope");

        assert_eq!(sim.packets(), before.as_slice());
        sim.step(&topology);
        assert!(sim.packets()[5..].iter().all(|p| p.size == 1500));
    }

    #[test]
    fn test_packet_rate_is_capped() {
        let topology = reference_topology().unwrap();
        let mut sim = SimulationEngine::seeded(SimulationSettings::default(), DEFAULT_TICK_INTERVAL, 5);
        sim.set_speed(10);
        sim.set_packet_rate(u32::MAX / 5);
        assert_eq!(sim.settings().packet_rate, MAX_PACKET_RATE);

        let report = sim.tick(TickKind::Periodic, &topology);
        assert_eq!(report.spawned, 100);

        let settings = SimulationSettings { packet_rate: 5000, ..Default::default() };
        let sim = SimulationEngine::seeded(settings, DEFAULT_TICK_INTERVAL, 5);
        assert_eq!(sim.settings().packet_rate, MAX_PACKET_RATE);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let topology = reference_topology().unwrap();
        let mut a = engine(SimulationSettings::default());
        let mut b = engine(SimulationSettings::default());
        for _ in 0..5 {
            a.tick(TickKind::Periodic, &topology);
            b.tick(TickKind::Periodic, &topology);
        }
        assert_eq!(a.packets(), b.packets());
    }

    #[test]
    fn test_single_link_receives_all_packets() {
        let topology = TopologyStore::from_parts(
            vec![
                Node::new("a", NodeKind::Site, "A", Point::new(0.0, 0.0)),
                Node::new("b", NodeKind::Cloud, "B", Point::new(10.0, 0.0)),
            ],
            vec![Link::new("only", "a", "b", LinkKind::Internet)],
        )
        .unwrap();
        let mut sim = engine(SimulationSettings::default());
        sim.tick(TickKind::Periodic, &topology);
        assert_eq!(sim.packets().len(), 5);
        assert!(sim.packets().iter().all(|p| p.link_id == "only"));

        let snapshot = sim.snapshot();
        assert_eq!(snapshot.packets, 5);
        assert_eq!(snapshot.packets_by_traffic.values().sum::<usize>(), 5);
    }
}
