//! Evaluator traits
//!
//! Command evaluators turn a desired room state into device actions.
//! Status evaluators pick the devices to query, generate the queries and
//! interpret the raw key/value pairs that come back.

use async_trait::async_trait;
use av_core::{
    Action, Device, DeviceDirectory, DirectoryError, PublicRoom, Room, StatusCommand,
};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Errors raised by evaluators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluatorError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("invalid {action} action for device {device}: {reason}")]
    InvalidAction {
        action: String,
        device: String,
        reason: String,
    },

    #[error("cannot interpret {key}={value} for device {device}: {reason}")]
    Interpretation {
        key: String,
        value: String,
        device: String,
        reason: String,
    },

    #[error("{0}")]
    Failed(String),
}

/// Result type for evaluator calls
pub type EvaluatorResult<T> = Result<T, EvaluatorError>;

/// What a command evaluator can see while evaluating a desired state
pub struct EvaluationContext<'a> {
    pub room: &'a Room,
    pub directory: &'a dyn DeviceDirectory,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(room: &'a Room, directory: &'a dyn DeviceDirectory) -> Self {
        Self { room, directory }
    }

    /// Resolve a named device, preferring the room's own device list
    ///
    /// Falls back to the directory only when the device is not in the room.
    pub async fn get_device(&self, name: &str) -> EvaluatorResult<Device> {
        if let Some(device) = self.room.device(name) {
            return Ok(device.clone());
        }

        debug!(device = %name, room = %self.room.name, "Device not in room, asking directory");
        let device = self
            .directory
            .get_device_by_name(&self.room.name, &self.room.building, name)
            .await?;
        Ok(device)
    }
}

/// Evaluates a desired room state into device actions
#[async_trait]
pub trait CommandEvaluator: Send + Sync {
    /// Build the actions needed to reach the desired state
    ///
    /// Returns no actions when the desired state does not ask for this
    /// evaluator's capability.
    async fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        desired: &PublicRoom,
    ) -> EvaluatorResult<Vec<Action>>;

    /// Check the actions this evaluator produced
    fn validate(&self, actions: &[Action]) -> EvaluatorResult<()>;

    /// Action names that cannot run on the same device as this one
    fn incompatible_actions(&self) -> &[&'static str];
}

/// Generates status queries and interprets their responses
pub trait StatusEvaluator: Send + Sync {
    /// Devices in the room this evaluator queries (or attributes results to)
    fn get_devices(&self, room: &Room) -> EvaluatorResult<Vec<Device>>;

    /// Status commands for the selected devices
    fn generate_commands(&self, devices: &[Device]) -> EvaluatorResult<Vec<StatusCommand>>;

    /// Translate a raw status pair into its public key and value
    fn evaluate_response(
        &self,
        key: &str,
        value: &Value,
        source: &Device,
        destination: &Device,
    ) -> EvaluatorResult<(String, Value)>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use av_core::RoomConfiguration;
    use tokio_test::block_on;

    fn device(name: &str) -> Device {
        Device {
            id: 1,
            name: name.to_string(),
            address: "10.0.0.1".to_string(),
            room: "1110".to_string(),
            building: "ITB".to_string(),
            commands: vec![],
            ports: vec![],
            roles: vec![],
            display: true,
            audio_device: false,
        }
    }

    /// Knows only devices outside the room's own list
    struct Backstage;

    #[async_trait]
    impl DeviceDirectory for Backstage {
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
            if name == "D9" {
                let mut d = device("D9");
                d.address = "directory".to_string();
                return Ok(d);
            }
            Err(DirectoryError::DeviceNotFound {
                building: building.to_string(),
                room: room.to_string(),
                name: name.to_string(),
            })
        }
    }

    #[test]
    fn test_get_device_prefers_room() {
        let room = Room {
            name: "1110".to_string(),
            building: "ITB".to_string(),
            devices: vec![device("D1")],
            configuration: RoomConfiguration::default(),
        };
        let ctx = EvaluationContext::new(&room, &Backstage);

        assert_eq!(block_on(ctx.get_device("d1")).unwrap().name, "D1");
        assert_eq!(block_on(ctx.get_device("D9")).unwrap().address, "directory");
        assert!(matches!(
            block_on(ctx.get_device("D2")),
            Err(EvaluatorError::Directory(DirectoryError::DeviceNotFound { .. }))
        ));
    }
}
