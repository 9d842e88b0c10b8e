//! `secrets.yaml` store

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// File holding secrets, next to the main configuration
pub const SECRETS_FILE: &str = "secrets.yaml";

/// Secret values keyed by name
///
/// Values keep their YAML type, so a secret port number substitutes as a
/// number.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    values: HashMap<String, Value>,
}

impl Secrets {
    /// Load `secrets.yaml` from a directory; a missing file means no secrets
    pub fn load(config_dir: &Path) -> ConfigResult<Self> {
        let path = config_dir.join(SECRETS_FILE);
        if !path.is_file() {
            debug!(path = %path.display(), "No secrets file");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
            path: path.clone(),
            source,
        })?;
        let values: HashMap<String, Value> =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::ParseYaml {
                path: path.clone(),
                source,
            })?;

        debug!(count = values.len(), "Loaded secrets");
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> ConfigResult<&Value> {
        self.values
            .get(key)
            .ok_or_else(|| ConfigError::SecretNotFound {
                key: key.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
