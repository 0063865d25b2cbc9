use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::simulation::types::{SimulationSettings, MAX_PACKET_RATE, MAX_SPEED, MIN_SPEED};

/// Smallest packet size the settings panel allows (bytes)
pub const MIN_PACKET_SIZE: u32 = 64;
/// Largest packet size the settings panel allows (bytes)
pub const MAX_PACKET_SIZE: u32 = 1500;

/// Top-level configuration structure that mirrors the YAML configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    pub simulation: SimulationConfig,
    pub canvas: CanvasConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            simulation: SimulationConfig::default(),
            canvas: CanvasConfig::default(),
        }
    }
}

/// Simulation knobs plus the timer settings that drive them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    #[serde(flatten)]
    pub settings: SimulationSettings,
    /// Wall-clock period between ticks while running (e.g. "100ms")
    #[serde(with = "humantime_serde")]
    pub tick_interval: Duration,
    /// Seed for packet placement; random when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            settings: SimulationSettings::default(),
            tick_interval: Duration::from_millis(100),
            seed: None,
        }
    }
}

/// Viewport and interaction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Fraction of the viewport the auto-fit fills with the node bounds
    pub fit_fill: f64,
    /// Length of the eased auto-fit transition (e.g. "750ms")
    #[serde(with = "humantime_serde")]
    pub transition: Duration,
    /// Whether clicking empty canvas clears the selection
    pub clear_selection_on_background: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 640.0,
            min_scale: 0.1,
            max_scale: 4.0,
            fit_fill: 0.9,
            transition: Duration::from_millis(750),
            clear_selection_on_background: false,
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let settings = &self.simulation.settings;
        if !(MIN_SPEED..=MAX_SPEED).contains(&settings.speed) {
            return Err(ValidationError::InvalidSimulation(format!(
                "speed must be between {} and {}, got {}",
                MIN_SPEED, MAX_SPEED, settings.speed
            )));
        }
        if !(MIN_PACKET_SIZE..=MAX_PACKET_SIZE).contains(&settings.packet_size) {
            return Err(ValidationError::InvalidSimulation(format!(
                "packet_size must be between {} and {} bytes, got {}",
                MIN_PACKET_SIZE, MAX_PACKET_SIZE, settings.packet_size
            )));
        }
        if settings.packet_rate > MAX_PACKET_RATE {
            return Err(ValidationError::InvalidSimulation(format!(
                "packet_rate must be at most {}, got {}",
                MAX_PACKET_RATE, settings.packet_rate
            )));
        }
        if self.simulation.tick_interval.is_zero() {
            return Err(ValidationError::InvalidSimulation(
                "tick_interval cannot be zero".to_string(),
            ));
        }

        let canvas = &self.canvas;
        if !(canvas.width > 0.0 && canvas.height > 0.0) {
            return Err(ValidationError::InvalidCanvas(format!(
                "viewport must be positive, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        if !(canvas.min_scale > 0.0 && canvas.min_scale <= canvas.max_scale) {
            return Err(ValidationError::InvalidCanvas(format!(
                "scale range [{}, {}] is invalid",
                canvas.min_scale, canvas.max_scale
            )));
        }
        if !(canvas.fit_fill > 0.0 && canvas.fit_fill <= 1.0) {
            return Err(ValidationError::InvalidCanvas(format!(
                "fit_fill must be in (0, 1], got {}",
                canvas.fit_fill
            )));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid simulation configuration: {0}")]
    InvalidSimulation(String),
    #[error("Invalid canvas configuration: {0}")]
    InvalidCanvas(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::types::TrafficPattern;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation.tick_interval, Duration::from_millis(100));
        assert_eq!(config.canvas.transition, Duration::from_millis(750));
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
log_level: debug
simulation:
  speed: 3
  traffic_pattern: custom
  tick_interval: 250ms
  seed: 9
canvas:
  width: 800
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.simulation.settings.speed, 3);
        assert_eq!(config.simulation.settings.traffic_pattern, TrafficPattern::Custom);
        assert_eq!(config.simulation.settings.packet_rate, 50);
        assert_eq!(config.simulation.tick_interval, Duration::from_millis(250));
        assert_eq!(config.simulation.seed, Some(9));
        assert_eq!(config.canvas.width, 800.0);
        assert_eq!(config.canvas.height, 640.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let mut config = Config::default();
        config.simulation.settings.speed = 11;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidSimulation(_))));

        let mut config = Config::default();
        config.simulation.settings.packet_size = 32;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidSimulation(_))));

        let mut config = Config::default();
        config.simulation.tick_interval = Duration::ZERO;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidSimulation(_))));

        let mut config = Config::default();
        config.canvas.min_scale = 5.0;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidCanvas(_))));

        let mut config = Config::default();
        config.canvas.fit_fill = 1.5;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidCanvas(_))));
    }
}
