//! Device and room configuration types
//!
//! These are owned by the configuration collaborator and are read-only to
//! the pipelines.

use serde::{Deserialize, Serialize};

use crate::EvaluatorKey;

/// A command a device supports, served by a control microservice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Command name (e.g., "PowerOn", "STATUS_Power")
    pub name: String,

    /// Endpoint path template (e.g., "/:address/power/on")
    pub endpoint: String,

    /// Base address of the microservice that serves this command
    pub microservice: String,
}

/// A physical port on a device
///
/// `source` names the device feeding the port and `destination` the device
/// it feeds; the port `name` is what the device itself reports and accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub source: String,
    pub destination: String,
}

/// A controllable device in a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Numeric device ID, unique across the directory
    pub id: i64,

    /// Device name, unique within a room (e.g., "D1", "AMP1")
    pub name: String,

    /// Network address substituted for `:address` in endpoint templates
    pub address: String,

    /// Name of the room the device belongs to
    #[serde(default)]
    pub room: String,

    /// Shortname of the building the device belongs to
    #[serde(default)]
    pub building: String,

    /// Commands the device supports
    #[serde(default)]
    pub commands: Vec<Command>,

    /// Ports on the device
    #[serde(default)]
    pub ports: Vec<Port>,

    /// Free-form roles (e.g., "VideoSwitcher")
    #[serde(default)]
    pub roles: Vec<String>,

    /// Whether the device is a display
    #[serde(default)]
    pub display: bool,

    /// Whether the device is an audio device
    #[serde(default)]
    pub audio_device: bool,
}

impl Device {
    /// Full name of the device: building, room and device name
    pub fn full_name(&self) -> String {
        format!("{}-{}-{}", self.building, self.room, self.name)
    }

    /// Find a command by name (case-insensitive)
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Check whether the device supports a command
    pub fn has_command(&self, name: &str) -> bool {
        self.command(name).is_some()
    }

    /// Check whether the device has a role (case-insensitive)
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    /// Check whether this is the named device in the given room and building
    pub fn matches(&self, name: &str, room: &str, building: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            && self.room.eq_ignore_ascii_case(room)
            && self.building.eq_ignore_ascii_case(building)
    }

    /// Find the port fed by the named source device
    pub fn port_from_source(&self, source: &str) -> Option<&Port> {
        self.ports
            .iter()
            .find(|p| p.source.eq_ignore_ascii_case(source))
    }

    /// Find a port by name
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// Per-room evaluator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfiguration {
    /// Configuration name (e.g., "Default")
    #[serde(default)]
    pub name: String,

    /// Evaluators that apply to the room, in evaluation order
    #[serde(default)]
    pub evaluators: Vec<EvaluatorKey>,
}

/// A room and the devices in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub building: String,

    #[serde(default)]
    pub devices: Vec<Device>,

    #[serde(default)]
    pub configuration: RoomConfiguration,
}

impl Room {
    /// Find a device in this room by name (case-insensitive)
    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices
            .iter()
            .find(|d| d.matches(name, &self.name, &self.building))
    }

    /// Devices flagged as displays
    pub fn displays(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|d| d.display)
    }

    /// Devices flagged as audio devices
    pub fn audio_devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|d| d.audio_device)
    }
}
