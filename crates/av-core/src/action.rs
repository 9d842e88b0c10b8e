//! Actions and their execution reports

use serde::{Deserialize, Serialize};

use crate::Device;

/// An intended operation on one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Action name; matches both the device command and the evaluator key
    pub action: String,

    /// Target device
    pub device: Device,

    /// Positional endpoint parameters
    #[serde(default)]
    pub parameters: Vec<String>,

    /// Whether the action targets this device by name rather than room-wide
    #[serde(default)]
    pub device_specific: bool,
}

impl Action {
    /// Create a room-wide action
    pub fn room_wide(action: impl Into<String>, device: Device, parameters: Vec<String>) -> Self {
        Self {
            action: action.into(),
            device,
            parameters,
            device_specific: false,
        }
    }

    /// Create a device-specific action
    pub fn device_specific(
        action: impl Into<String>,
        device: Device,
        parameters: Vec<String>,
    ) -> Self {
        Self {
            action: action.into(),
            device,
            parameters,
            device_specific: true,
        }
    }
}

/// Outcome of executing one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub success: bool,
    pub action: String,
    pub device: String,
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionReport {
    pub fn succeeded(action: &Action) -> Self {
        Self {
            success: true,
            action: action.action.clone(),
            device: action.device.name.clone(),
            error: None,
        }
    }

    pub fn failed(action: &Action, error: impl Into<String>) -> Self {
        Self {
            success: false,
            action: action.action.clone(),
            device: action.device.name.clone(),
            error: Some(error.into()),
        }
    }
}
