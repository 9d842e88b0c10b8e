//! Desired state evaluation

use av_core::{Action, DeviceDirectory, PublicRoom, Room};
use av_evaluator_registry::{EvaluationContext, Registry};
use tracing::{debug, instrument};

use crate::error::{CommandError, CommandResult};

/// Evaluate a desired room state into candidate actions
///
/// Runs every command evaluator listed in the room configuration, in listed
/// order, and checks each evaluator's output with its own `validate` before
/// concatenating. Status evaluator keys in the configuration are ignored.
#[instrument(skip_all, fields(building = %room.building, room = %room.name))]
pub async fn evaluate(
    registry: &Registry,
    directory: &dyn DeviceDirectory,
    room: &Room,
    desired: &PublicRoom,
) -> CommandResult<Vec<Action>> {
    let ctx = EvaluationContext::new(room, directory);
    let mut actions = Vec::new();

    for key in room.configuration.evaluators.iter().filter(|k| !k.is_status()) {
        let evaluator = registry.command(*key)?;

        let produced = evaluator
            .evaluate(&ctx, desired)
            .await
            .map_err(|e| CommandError::from_evaluator(*key, e))?;

        evaluator
            .validate(&produced)
            .map_err(|e| CommandError::from_evaluator(*key, e))?;

        debug!(evaluator = %key, count = produced.len(), "Evaluated");
        actions.extend(produced);
    }

    Ok(actions)
}
