//! # topo-sim - Network topology editor and traffic animator core
//!
//! This library holds the state and logic behind an interactive network
//! topology editor: an editable graph of sites, routers and cloud nodes,
//! a tick-driven packet animation over its links, and a zoomable canvas
//! that maps pointer gestures onto topology edits.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `topology`: Nodes, links, selection and the store that keeps them consistent
//! - `simulation`: Packet spawning and advancement, run control and tick scheduling
//! - `render`: View transform, scene projection, gestures and SVG output
//! - `session`: Single-threaded event loop tying the three together
//! - `config` / `config_loader`: YAML configuration and validation
//! - `utils`: Utility functions and helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::time::{Duration, Instant};
//! use topo_sim::config::Config;
//! use topo_sim::session::{InputEvent, Session};
//! use topo_sim::topology::reference_topology;
//!
//! let mut session = Session::new(&Config::default(), reference_topology()?);
//! let start = Instant::now();
//! session.handle(InputEvent::Start, start);
//! session.pump(start + Duration::from_millis(500));
//!
//! let scene = session.render();
//! println!("{} packets in flight", scene.packets.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Configuration Format
//!
//! Every key is optional:
//!
//! ```yaml
//! log_level: info
//!
//! simulation:
//!   speed: 2
//!   packet_rate: 50
//!   packet_size: 512
//!   traffic_pattern: uniform
//!   routing_algorithm: shortest-path
//!   fec_enabled: false
//!   tick_interval: 100ms
//!   seed: 42
//!
//! canvas:
//!   width: 960
//!   height: 640
//!   transition: 750ms
//! ```
//!
//! ## Error Handling
//!
//! Topology and configuration errors are typed `thiserror` enums. The
//! configuration loader and the binary report through `color_eyre`.

pub mod config;
pub mod config_loader;
pub mod topology;
pub mod simulation;
pub mod render;
pub mod session;
pub mod utils;
