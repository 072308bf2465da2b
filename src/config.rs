//! Optional YAML client configuration.
//!
//! ```yaml
//! port: 5555
//! seed: 42
//! log_level: debug
//! ```
//!
//! Every field is optional; command-line values take precedence.

use std::fs::File;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Agent port, used when `--port` is not given
    #[serde(default)]
    pub port: Option<u16>,

    /// Seed for plan generation, used when `--seed` is not given
    #[serde(default)]
    pub seed: Option<u64>,

    /// Default log filter, overridden by `RUST_LOG`
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Load and parse configuration from a YAML file.
///
/// Logging is usually not initialised yet when this runs, so nothing is
/// logged here.
pub fn load_config(config_path: &Path) -> Result<ClientConfig> {
    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open config file '{}'", config_path.display()))?;
    parse_config(file)
        .wrap_err_with(|| format!("Failed to parse config file '{}'", config_path.display()))
}

fn parse_config<R: std::io::Read>(reader: R) -> Result<ClientConfig> {
    // An empty document deserializes to unit, not a map
    let value: serde_yaml::Value = serde_yaml::from_reader(reader)?;
    if value.is_null() {
        return Ok(ClientConfig::default());
    }
    Ok(serde_yaml::from_value(value)?)
}

/// Settings resolved from the command line and config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub port: Option<u16>,
    pub seed: Option<u64>,
    pub dry_run: bool,
}

impl Settings {
    /// Merge command-line values over the config file.
    pub fn resolve(port: Option<u16>, seed: Option<u64>, dry_run: bool, config: &ClientConfig) -> Self {
        Self {
            port: port.or(config.port),
            seed: seed.or(config.seed),
            dry_run,
        }
    }
}
