//! Room/device directory backed by the loaded configuration

use std::collections::HashMap;

use async_trait::async_trait;
use av_core::{Device, DeviceDirectory, DirectoryError, Room};
use tracing::debug;

/// In-memory directory of configured rooms
///
/// Lookups ignore case. Devices that do not name their room or building
/// inherit them from the room they are listed in.
#[derive(Debug, Clone, Default)]
pub struct YamlDirectory {
    rooms: HashMap<(String, String), Room>,
}

fn key(building: &str, room: &str) -> (String, String) {
    (building.to_lowercase(), room.to_lowercase())
}

impl YamlDirectory {
    pub fn new(rooms: impl IntoIterator<Item = Room>) -> Self {
        let rooms = rooms
            .into_iter()
            .map(|mut room| {
                for device in &mut room.devices {
                    if device.room.is_empty() {
                        device.room = room.name.clone();
                    }
                    if device.building.is_empty() {
                        device.building = room.building.clone();
                    }
                }
                (key(&room.building, &room.name), room)
            })
            .collect();

        Self { rooms }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[async_trait]
impl DeviceDirectory for YamlDirectory {
    async fn get_room(&self, building: &str, room: &str) -> Result<Room, DirectoryError> {
        self.rooms
            .get(&key(building, room))
            .cloned()
            .ok_or_else(|| DirectoryError::RoomNotFound {
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
        debug!(%building, %room, %name, "Directory device lookup");

        self.rooms
            .get(&key(building, room))
            .and_then(|r| r.device(name))
            .cloned()
            .ok_or_else(|| DirectoryError::DeviceNotFound {
                building: building.to_string(),
                room: room.to_string(),
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use av_core::RoomConfiguration;
    use tokio_test::block_on;

    fn room() -> Room {
        Room {
            name: "1110".to_string(),
            building: "ITB".to_string(),
            devices: vec![serde_yaml::from_str("id: 1\nname: D1\naddress: 10.0.0.1\n").unwrap()],
            configuration: RoomConfiguration::default(),
        }
    }

    #[test]
    fn test_get_room_ignores_case() {
        let directory = YamlDirectory::new([room()]);

        let found = block_on(directory.get_room("itb", "1110")).unwrap();
        assert_eq!(found.devices.len(), 1);

        assert_eq!(
            block_on(directory.get_room("ITB", "1108")).unwrap_err(),
            DirectoryError::RoomNotFound {
                building: "ITB".to_string(),
                room: "1108".to_string(),
            }
        );
    }

    #[test]
    fn test_devices_inherit_room_and_building() {
        let directory = YamlDirectory::new([room()]);

        let device = block_on(directory.get_device_by_name("1110", "itb", "d1")).unwrap();
        assert_eq!(device.full_name(), "ITB-1110-D1");

        assert!(matches!(
            block_on(directory.get_device_by_name("1110", "ITB", "D9")),
            Err(DirectoryError::DeviceNotFound { .. })
        ));
    }
}
