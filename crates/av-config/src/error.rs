//! Configuration errors

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML in {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{tag} in {path} expects a string argument")]
    TagArgument { tag: String, path: PathBuf },

    #[error("circular include: {path}")]
    CircularInclude { path: PathBuf },

    #[error("secret '{key}' not found in secrets.yaml")]
    SecretNotFound { key: String },

    #[error("environment variable '{var}' not set")]
    EnvVarNotFound { var: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
