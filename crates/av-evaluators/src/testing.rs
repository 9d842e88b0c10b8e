//! Shared fixtures for evaluator tests

use async_trait::async_trait;
use av_core::{
    Command, Device, DeviceDirectory, DirectoryError, EvaluatorKey, Port, Room,
    RoomConfiguration,
};

pub fn command(name: &str, endpoint: &str) -> Command {
    Command {
        name: name.to_string(),
        endpoint: endpoint.to_string(),
        microservice: "http://control:8000".to_string(),
    }
}

pub fn port(name: &str, source: &str, destination: &str) -> Port {
    Port {
        name: name.to_string(),
        source: source.to_string(),
        destination: destination.to_string(),
    }
}

pub fn device(id: i64, name: &str, commands: &[&str]) -> Device {
    Device {
        id,
        name: name.to_string(),
        address: format!("{}.byu.edu", name.to_lowercase()),
        room: "1110".to_string(),
        building: "ITB".to_string(),
        commands: commands
            .iter()
            .map(|c| command(c, &format!("/:address/{}", c.to_lowercase())))
            .collect(),
        ports: vec![],
        roles: vec![],
        display: false,
        audio_device: false,
    }
}

pub fn display(id: i64, name: &str) -> Device {
    let mut d = device(
        id,
        name,
        &[
            "PowerOn",
            "Standby",
            "ChangeInput",
            "BlankDisplay",
            "UnblankDisplay",
            "STATUS_Power",
            "STATUS_Blanked",
            "STATUS_Input",
        ],
    );
    d.display = true;
    d.ports = vec![
        port("hdmi1", "HDMIIn", name),
        port("hdmi2", "VIA1", name),
    ];
    d
}

pub fn amp(id: i64, name: &str) -> Device {
    let mut d = device(
        id,
        name,
        &[
            "PowerOn",
            "Standby",
            "ChangeInput",
            "Mute",
            "UnMute",
            "SetVolume",
            "STATUS_Power",
            "STATUS_Muted",
            "STATUS_Volume",
            "STATUS_Input",
        ],
    );
    d.audio_device = true;
    d.ports = vec![port("aux1", "HDMIIn", name), port("aux2", "VIA1", name)];
    d
}

pub fn switcher(id: i64, name: &str) -> Device {
    let mut d = device(id, name, &["STATUS_Input"]);
    d.roles = vec!["VideoSwitcher".to_string()];
    d.ports = vec![
        port("in1", "HDMIIn", name),
        port("in2", "VIA1", name),
        port("out1", name, "D1"),
        port("out2", name, "D2"),
    ];
    d
}

/// ITB-1110: two displays, an amplifier and a video switcher
pub fn room() -> Room {
    Room {
        name: "1110".to_string(),
        building: "ITB".to_string(),
        devices: vec![
            display(1, "D1"),
            display(2, "D2"),
            amp(3, "AMP1"),
            switcher(4, "SW1"),
        ],
        configuration: RoomConfiguration {
            name: "Default".to_string(),
            evaluators: EvaluatorKey::ALL.to_vec(),
        },
    }
}

/// Directory that knows a fixed set of extra devices
#[derive(Default)]
pub struct FixedDirectory {
    pub devices: Vec<Device>,
}

#[async_trait]
impl DeviceDirectory for FixedDirectory {
    async fn get_room(&self, building: &str, room: &str) -> Result<Room, DirectoryError> {
        Err(DirectoryError::RoomNotFound {
            building: building.to_string(),
            room: room.to_string(),
        })
    }

    async fn get_device_by_name(
        &self,
        room: &str,
        building: &str,
        name: &str,
    ) -> Result<Device, DirectoryError> {
        self.devices
            .iter()
            .find(|d| d.matches(name, room, building))
            .cloned()
            .ok_or_else(|| DirectoryError::DeviceNotFound {
                building: building.to_string(),
                room: room.to_string(),
                name: name.to_string(),
            })
    }
}
