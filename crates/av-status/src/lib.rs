//! Status pipeline for the AV control API
//!
//! Reads a room's current state in three stages:
//!
//! 1. [`generate_status_commands`] asks each configured status evaluator
//!    which devices to query and how
//! 2. [`run_status_commands`] queries distinct devices concurrently
//! 3. [`evaluate_responses`] interprets and merges the raw fragments into
//!    a [`PublicRoom`]

mod aggregate;
mod error;
mod generate;
mod run;

pub use aggregate::{evaluate_responses, process_audio_device, process_display};
pub use error::{StatusError, StatusResult};
pub use generate::generate_status_commands;
pub use run::run_status_commands;

use std::sync::Arc;

use av_core::{DeviceDirectory, DeviceTransport, ErrorPublisher, PublicRoom, Room};
use av_evaluator_registry::{Registry, SharedRegistry};
use tracing::{info, instrument};

/// Run all three stages against one room
pub async fn get_room_state(
    registry: &Registry,
    transport: Arc<dyn DeviceTransport>,
    publisher: &dyn ErrorPublisher,
    room: &Room,
) -> StatusResult<PublicRoom> {
    let commands = generate_status_commands(registry, room)?;
    let responses = run_status_commands(commands, transport, publisher).await?;

    let mut state = evaluate_responses(registry, &responses)?;
    state.building = room.building.clone();
    state.room = room.name.clone();
    Ok(state)
}

/// Reads room state using shared collaborators
#[derive(Clone)]
pub struct StatusPoller {
    registry: SharedRegistry,
    directory: Arc<dyn DeviceDirectory>,
    transport: Arc<dyn DeviceTransport>,
    publisher: Arc<dyn ErrorPublisher>,
}

impl StatusPoller {
    pub fn new(
        registry: SharedRegistry,
        directory: Arc<dyn DeviceDirectory>,
        transport: Arc<dyn DeviceTransport>,
        publisher: Arc<dyn ErrorPublisher>,
    ) -> Self {
        Self {
            registry,
            directory,
            transport,
            publisher,
        }
    }

    /// Look up a room and read its current state
    #[instrument(skip(self))]
    pub async fn get_room_state(&self, building: &str, room: &str) -> StatusResult<PublicRoom> {
        let room = self.directory.get_room(building, room).await?;

        let state = get_room_state(
            &self.registry,
            self.transport.clone(),
            self.publisher.as_ref(),
            &room,
        )
        .await?;

        info!(
            displays = state.displays.len(),
            audio_devices = state.audio_devices.len(),
            "Room state read"
        );
        Ok(state)
    }
}
