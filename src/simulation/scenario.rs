//! Predefined scenarios.
//!
//! Loading a scenario is acknowledged but does not touch the topology or
//! the traffic yet. The catalog is what the scenario panel lists.

use std::fmt;

use log::{error, info};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Complexity {
    Basic,
    Moderate,
    Advanced,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One entry of the scenario catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub complexity: Complexity,
    /// What loading this scenario would change once wired up
    pub effect: &'static str,
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        id: "link-failure",
        title: "Link Failure",
        description: "Simulates a WAN link failure to test failover capabilities",
        complexity: Complexity::Basic,
        effect: "take a link out of the topology",
    },
    Scenario {
        id: "congestion",
        title: "Network Congestion",
        description: "Simulates high traffic congestion on primary links",
        complexity: Complexity::Moderate,
        effect: "degrade link properties on the primary paths",
    },
    Scenario {
        id: "ddos",
        title: "DDoS Attack",
        description: "Simulates a distributed denial of service attack scenario",
        complexity: Complexity::Advanced,
        effect: "flood the network with attack traffic",
    },
    Scenario {
        id: "policy-change",
        title: "Policy Change",
        description: "Changes routing policies to test dynamic adaptation",
        complexity: Complexity::Moderate,
        effect: "replace the active routing policies",
    },
    Scenario {
        id: "high-availability",
        title: "High Availability",
        description: "Tests failover between redundant SD-WAN controllers",
        complexity: Complexity::Advanced,
        effect: "fail over between redundant controllers",
    },
];

pub fn find_scenario(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}

/// Result of a `load_scenario` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioOutcome {
    Acknowledged(&'static Scenario),
    Unknown(String),
}

impl ScenarioOutcome {
    /// User-facing acknowledgement text
    pub fn message(&self) -> String {
        match self {
            Self::Acknowledged(scenario) => format!(
                "Scenario \"{}\" loaded. Once implemented it will {}.",
                scenario.title, scenario.effect
            ),
            Self::Unknown(id) => format!("Unknown scenario: {}", id),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Acknowledged(_))
    }
}

/// Look up and acknowledge a scenario. Never mutates any state.
pub fn load_scenario(id: &str) -> ScenarioOutcome {
    match find_scenario(id) {
        Some(scenario) => {
            let outcome = ScenarioOutcome::Acknowledged(scenario);
            info!("{}", outcome.message());
            outcome
        }
        None => {
            let outcome = ScenarioOutcome::Unknown(id.to_string());
            error!("{}", outcome.message());
            outcome
        }
    }
}
