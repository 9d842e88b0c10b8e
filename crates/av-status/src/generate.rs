//! Status command generation

use av_core::{Room, StatusCommand};
use av_evaluator_registry::Registry;
use tracing::{debug, instrument};

use crate::error::{StatusError, StatusResult};

/// Generate the status queries for a room
///
/// Every status evaluator listed in the room configuration selects its
/// devices and builds commands for them. Command evaluator keys in the
/// configuration are ignored.
#[instrument(skip_all, fields(building = %room.building, room = %room.name))]
pub fn generate_status_commands(
    registry: &Registry,
    room: &Room,
) -> StatusResult<Vec<StatusCommand>> {
    let mut commands = Vec::new();

    for key in room.configuration.evaluators.iter().filter(|k| k.is_status()) {
        let evaluator = registry.status(*key)?;

        let devices = evaluator
            .get_devices(room)
            .map_err(|source| StatusError::Evaluation {
                evaluator: *key,
                source,
            })?;

        let generated = evaluator
            .generate_commands(&devices)
            .map_err(|source| StatusError::Evaluation {
                evaluator: *key,
                source,
            })?;

        debug!(evaluator = %key, devices = devices.len(), commands = generated.len(), "Generated");
        commands.extend(generated);
    }

    Ok(commands)
}
