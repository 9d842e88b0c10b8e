//! Service configuration
//!
//! Parses `config.yaml`: server, transport and logging settings plus the
//! rooms the service controls.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use av_core::Room;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, ConfigResult};
use crate::loader::YamlLoader;

/// Name of the main configuration file
pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the REST API listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Per-request timeout for device microservice calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl TransportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Rooms with their devices and evaluator configuration
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl ServiceConfig {
    /// Load `config.yaml` from a configuration directory
    pub fn load(config_dir: &Path) -> ConfigResult<Self> {
        Self::load_file(config_dir, &config_dir.join(CONFIG_FILE))
    }

    /// Load a specific file, resolving secrets from `config_dir`
    pub fn load_file(config_dir: &Path, path: &Path) -> ConfigResult<Self> {
        let value = YamlLoader::new(config_dir)?.load_file(path)?;
        let config: ServiceConfig =
            serde_yaml::from_value(value).map_err(|source| ConfigError::Deserialize {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        info!(rooms = config.rooms.len(), "Loaded service configuration");
        Ok(config)
    }

    /// Reject duplicate rooms, device names within a room and device IDs
    pub fn validate(&self) -> ConfigResult<()> {
        let mut rooms = HashSet::new();
        let mut ids = HashSet::new();

        for room in &self.rooms {
            let key = (room.building.to_lowercase(), room.name.to_lowercase());
            if !rooms.insert(key) {
                return Err(ConfigError::Invalid(format!(
                    "room {}-{} is defined more than once",
                    room.building, room.name
                )));
            }

            let mut names = HashSet::new();
            for device in &room.devices {
                if !names.insert(device.name.to_lowercase()) {
                    return Err(ConfigError::Invalid(format!(
                        "device {} is defined more than once in {}-{}",
                        device.name, room.building, room.name
                    )));
                }
                if !ids.insert(device.id) {
                    return Err(ConfigError::Invalid(format!(
                        "device ID {} is used more than once",
                        device.id
                    )));
                }
            }
        }

        Ok(())
    }
}
