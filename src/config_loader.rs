use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration {:?}", config_path))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration {:?}", config_path))?;

    config.validate()?;

    Ok(config)
}

/// Load the configuration at `config_path`, or the defaults when no path is given
pub fn load_or_default(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("No configuration file given; using defaults");
            Ok(Config::default())
        }
    }
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub seed: Option<u64>,
    pub speed: Option<u8>,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(seed) = overrides.seed {
        info!("Seed override: {}", seed);
        config.simulation.seed = Some(seed);
    }

    if let Some(speed) = overrides.speed {
        info!("Speed override: {}", speed);
        config.simulation.settings.speed = speed;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_file() {
        let yaml = r#"
simulation:
  packet_rate: 80
  packet_size: 1024
  fec_enabled: true
canvas:
  clear_selection_on_background: true
  transition: 1s
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.simulation.settings.packet_rate, 80);
        assert_eq!(config.simulation.settings.packet_size, 1024);
        assert!(config.simulation.settings.fec_enabled);
        assert!(config.canvas.clear_selection_on_background);
        assert_eq!(config.canvas.transition.as_millis(), 1000);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "simulation:\n  packet_rate: 500\n").unwrap();
        assert!(load_config(temp_file.path()).is_err());

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "simulation: [not, a, map]\n").unwrap();
        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/topo-sim.yaml")).is_err());
        assert_eq!(load_or_default(None).unwrap(), Config::default());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        let overrides = CliOverrides { seed: Some(11), speed: Some(4) };
        apply_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.simulation.seed, Some(11));
        assert_eq!(config.simulation.settings.speed, 4);

        let overrides = CliOverrides { seed: None, speed: Some(0) };
        assert!(apply_overrides(&mut config, &overrides).is_err());
    }
}
