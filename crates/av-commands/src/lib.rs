//! Command dispatch for the AV control API
//!
//! Turns a desired room state into device commands in three stages:
//!
//! 1. [`evaluate`] asks each configured command evaluator for actions
//! 2. [`reconcile`] decides which actions are overridden by incompatible
//!    ones on the same device
//! 3. [`execute`] sends the surviving actions to their devices
//!
//! [`CommandDispatcher`] wires the stages to a registry, directory and
//! transport.

mod error;
mod evaluate;
mod execute;
mod reconcile;

pub use error::{CommandError, CommandResult};
pub use evaluate::evaluate;
pub use execute::execute;
pub use reconcile::{reconcile, Reconciliation};

use std::sync::Arc;

use av_core::{DeviceDirectory, DeviceTransport, ExecutionReport, PublicRoom, Room};
use av_evaluator_registry::{Registry, SharedRegistry};
use tracing::{info, instrument};

/// Run all three stages against one room
pub async fn set_room_state(
    registry: &Registry,
    directory: &dyn DeviceDirectory,
    transport: &dyn DeviceTransport,
    room: &Room,
    desired: &PublicRoom,
) -> CommandResult<Vec<ExecutionReport>> {
    let actions = evaluate(registry, directory, room, desired).await?;
    let reconciliation = reconcile(registry, &actions)?;
    execute(&actions, &reconciliation, transport).await
}

/// Dispatches desired room states using shared collaborators
#[derive(Clone)]
pub struct CommandDispatcher {
    registry: SharedRegistry,
    directory: Arc<dyn DeviceDirectory>,
    transport: Arc<dyn DeviceTransport>,
}

impl CommandDispatcher {
    pub fn new(
        registry: SharedRegistry,
        directory: Arc<dyn DeviceDirectory>,
        transport: Arc<dyn DeviceTransport>,
    ) -> Self {
        Self {
            registry,
            directory,
            transport,
        }
    }

    /// Look up a room and drive it to the desired state
    #[instrument(skip(self, desired))]
    pub async fn set_room_state(
        &self,
        building: &str,
        room: &str,
        desired: &PublicRoom,
    ) -> CommandResult<Vec<ExecutionReport>> {
        let room = self.directory.get_room(building, room).await?;

        let reports = set_room_state(
            &self.registry,
            self.directory.as_ref(),
            self.transport.as_ref(),
            &room,
            desired,
        )
        .await?;

        let failed = reports.iter().filter(|r| !r.success).count();
        info!(sent = reports.len(), failed, "Room state applied");
        Ok(reports)
    }
}
