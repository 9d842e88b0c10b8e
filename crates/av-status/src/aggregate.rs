//! Response aggregation
//!
//! Folds raw status fragments into one status record per destination
//! device, then projects those records into the public room shape.

use av_core::{AudioDevice, Display, PublicRoom, Status, StatusResponse};
use av_evaluator_registry::{EvaluatorError, EvaluatorResult, Registry};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::StatusResult;

/// Interpret status responses into a public room state
///
/// Error-carrying responses are skipped. Each raw pair goes through the
/// evaluator that generated the response; a pair it cannot interpret is
/// logged and dropped. Records are keyed by destination full name in
/// first-seen order and later pairs overwrite earlier ones. Only the
/// `displays` and `audioDevices` lists are filled.
#[instrument(skip_all, fields(count = responses.len()))]
pub fn evaluate_responses(
    registry: &Registry,
    responses: &[StatusResponse],
) -> StatusResult<PublicRoom> {
    let mut statuses: IndexMap<String, Status> = IndexMap::new();

    for response in responses {
        if let Some(error) = &response.error {
            debug!(device = %response.source.name, %error, "Skipping failed response");
            continue;
        }

        let evaluator = registry.status(response.generator)?;

        for (key, value) in &response.status {
            match evaluator.evaluate_response(key, value, &response.source, &response.destination)
            {
                Ok((key, value)) => {
                    // Records appear only once something about the device is known
                    statuses
                        .entry(response.destination.full_name())
                        .or_insert_with(|| Status::new(response.destination.clone()))
                        .status
                        .insert(key, value);
                }
                Err(e) => {
                    warn!(generator = %response.generator, error = %e, "Skipping status value");
                }
            }
        }
    }

    let mut room = PublicRoom::default();

    for status in statuses.values() {
        let device = &status.destination;

        if device.display {
            match process_display(status) {
                Ok(display) => room.displays.push(display),
                Err(e) => warn!(device = %device.name, error = %e, "Skipping display"),
            }
        }

        if device.audio_device {
            match process_audio_device(status) {
                Ok(audio) => room.audio_devices.push(audio),
                Err(e) => warn!(device = %device.name, error = %e, "Skipping audio device"),
            }
        }
    }

    Ok(room)
}

/// Project a status record into the public display shape
pub fn process_display(status: &Status) -> EvaluatorResult<Display> {
    Ok(Display {
        name: status.destination.name.clone(),
        power: string_field(status, "power")?,
        input: string_field(status, "input")?,
        blanked: bool_field(status, "blanked")?,
    })
}

/// Project a status record into the public audio device shape
pub fn process_audio_device(status: &Status) -> EvaluatorResult<AudioDevice> {
    Ok(AudioDevice {
        name: status.destination.name.clone(),
        power: string_field(status, "power")?,
        input: string_field(status, "input")?,
        muted: bool_field(status, "muted")?,
        volume: integer_field(status, "volume")?,
    })
}

fn field<'a, T>(
    status: &'a Status,
    key: &str,
    convert: impl FnOnce(&'a Value) -> Option<T>,
) -> EvaluatorResult<Option<T>> {
    let Some(value) = status.status.get(key) else {
        return Ok(None);
    };

    convert(value)
        .map(Some)
        .ok_or_else(|| EvaluatorError::Interpretation {
            key: key.to_string(),
            value: value.to_string(),
            device: status.destination.name.clone(),
            reason: "unexpected value type".to_string(),
        })
}

fn string_field(status: &Status, key: &str) -> EvaluatorResult<Option<String>> {
    field(status, key, |v| v.as_str().map(str::to_string))
}

fn bool_field(status: &Status, key: &str) -> EvaluatorResult<Option<bool>> {
    field(status, key, Value::as_bool)
}

fn integer_field(status: &Status, key: &str) -> EvaluatorResult<Option<i64>> {
    field(status, key, Value::as_i64)
}
