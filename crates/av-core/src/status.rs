//! Status commands, responses and merged per-device status

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Command, Device, EvaluatorKey};

/// Raw or interpreted status fragments keyed by status name
pub type StatusMap = BTreeMap<String, serde_json::Value>;

/// A single device/capability status query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCommand {
    /// The device command to invoke
    pub action: Command,

    /// The device actually queried
    pub device: Device,

    /// The device the result is attributed to
    pub destination: Device,

    /// Positional endpoint parameters
    #[serde(default)]
    pub parameters: Vec<String>,

    /// Evaluator that generated the command and interprets its response
    pub generator: EvaluatorKey,
}

impl StatusCommand {
    /// Create a command whose result is attributed to the queried device
    pub fn direct(action: Command, device: Device, generator: EvaluatorKey) -> Self {
        Self {
            action,
            destination: device.clone(),
            device,
            parameters: Vec::new(),
            generator,
        }
    }
}

/// Result of executing one status command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: StatusMap,
    pub source: Device,
    pub destination: Device,
    pub generator: EvaluatorKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    /// Build a successful response for a command
    pub fn ok(command: &StatusCommand, status: StatusMap) -> Self {
        Self {
            status,
            source: command.device.clone(),
            destination: command.destination.clone(),
            generator: command.generator,
            error: None,
        }
    }

    /// Build an error-carrying response for a command
    pub fn failed(command: &StatusCommand, error: impl Into<String>) -> Self {
        Self {
            status: StatusMap::new(),
            source: command.device.clone(),
            destination: command.destination.clone(),
            generator: command.generator,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Interpreted status merged for one destination device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub status: StatusMap,
    pub destination: Device,
}

impl Status {
    pub fn new(destination: Device) -> Self {
        Self {
            status: StatusMap::new(),
            destination,
        }
    }
}
