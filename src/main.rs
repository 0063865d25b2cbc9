use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use topo_sim::config_loader::{self, CliOverrides};
use topo_sim::render::scene_to_svg;
use topo_sim::session::{EventOutcome, InputEvent, Session};
use topo_sim::topology::reference_topology;
use topo_sim::utils::parse_duration;

/// Run the reference network through the traffic animation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How long to run the simulation, e.g. "3s" or "500ms"
    #[arg(short, long, default_value = "3s", value_parser = parse_duration)]
    duration: Duration,

    /// Seed for packet spawning and node placement
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation speed (1-10)
    #[arg(long)]
    speed: Option<u8>,

    /// Manual steps to take before running
    #[arg(long, default_value_t = 0)]
    steps: u32,

    /// Scenario to load (repeatable)
    #[arg(long = "scenario")]
    scenarios: Vec<String>,

    /// Node to delete before running (repeatable)
    #[arg(long = "remove-node")]
    remove_nodes: Vec<String>,

    /// Write the final frame as SVG
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Print a JSON summary of the final state
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    let mut config = config_loader::load_or_default(args.config.as_deref())?;
    config_loader::apply_overrides(&mut config, &CliOverrides { seed: args.seed, speed: args.speed })?;

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str())).init();

    info!("Starting topo-sim");
    if let Some(path) = &args.config {
        info!("Configuration file: {:?}", path);
    }

    let store = reference_topology().wrap_err("Failed to build the reference topology")?;
    let mut session = Session::new(&config, store);
    let mut now = Instant::now();

    for id in &args.remove_nodes {
        if session.store().contains_node(id) {
            session.store_mut().remove_node(id);
        } else {
            warn!("No node '{}' to remove", id);
        }
    }

    for id in &args.scenarios {
        if let EventOutcome::Scenario(outcome) = session.handle(InputEvent::LoadScenario(id.clone()), now) {
            info!("{}", outcome.message());
        }
    }

    for _ in 0..args.steps {
        if let EventOutcome::Stepped(Some(report)) = session.handle(InputEvent::Step, now) {
            info!(
                "Step: {} spawned, {} completed, {} in flight",
                report.spawned, report.completed, report.in_flight
            );
        }
    }

    if !args.duration.is_zero() {
        session.handle(InputEvent::Start, now);
        let interval = session.engine().tick_interval();
        let deadline = now + args.duration;
        while now < deadline {
            thread::sleep(interval.min(deadline.saturating_duration_since(now)));
            now = Instant::now();
            session.pump(now);
        }
        session.handle(InputEvent::Pause, now);
        info!(
            "Ran {} ticks; {} packets in flight",
            session.engine().ticks(),
            session.engine().packets().len()
        );
    }

    // Let the initial fit start and run to completion before drawing
    session.pump(now);
    session.pump(now + config.canvas.transition);

    if let Some(path) = &args.svg {
        fs::write(path, scene_to_svg(&session.render()))
            .wrap_err_with(|| format!("Failed to write SVG to '{}'", path.display()))?;
        info!("Wrote scene to {:?}", path);
    }

    if args.summary {
        let summary = serde_json::to_string_pretty(&session.snapshot())
            .wrap_err("Failed to serialize summary")?;
        println!("{}", summary);
    }

    info!("Done");
    Ok(())
}
