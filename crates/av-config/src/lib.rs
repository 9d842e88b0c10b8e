//! Configuration for the AV control API
//!
//! `config.yaml` is loaded with three custom tags:
//!
//! - `!include path` - splice in another YAML file (relative to the includer)
//! - `!secret key` - substitute a value from `secrets.yaml`
//! - `!env_var NAME` - substitute an environment variable
//!
//! The configured rooms back a [`YamlDirectory`], the service's
//! room/device directory.

mod directory;
mod error;
mod loader;
mod secrets;
mod service;

pub use directory::YamlDirectory;
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_yaml, YamlLoader};
pub use secrets::{Secrets, SECRETS_FILE};
pub use service::{LoggingConfig, ServerConfig, ServiceConfig, TransportConfig, CONFIG_FILE};
