//! Public room representation
//!
//! The same document describes a desired room state (input to the command
//! pipeline) and the canonical current state (output of the status pipeline).

use serde::{Deserialize, Serialize};

/// Public state of a room
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRoom {
    #[serde(default)]
    pub building: String,

    #[serde(default)]
    pub room: String,

    /// Source device routed to every display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_video_input: Option<String>,

    /// Source device routed to every audio device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_audio_input: Option<String>,

    /// Room-wide power state ("on" or "standby")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blanked: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,

    #[serde(default)]
    pub displays: Vec<Display>,

    #[serde(default)]
    pub audio_devices: Vec<AudioDevice>,
}

/// Public state of a display
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Display {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blanked: Option<bool>,
}

/// Public state of an audio device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioDevice {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
}
