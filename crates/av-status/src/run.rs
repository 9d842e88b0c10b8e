//! Concurrent status command execution

use std::collections::BTreeMap;
use std::sync::Arc;

use av_core::{
    build_endpoint, DeviceTransport, ErrorCause, ErrorPublisher, StatusCommand, StatusMap,
    StatusResponse,
};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::error::{StatusError, StatusResult};

/// Run status commands with one task per queried device
///
/// Commands for the same device run sequentially inside its task; distinct
/// devices are queried concurrently. Every task is joined before anything
/// is returned. A failed query becomes an error-carrying response and is
/// reported to `publisher`; it never fails the call.
#[instrument(skip_all, fields(count = commands.len()))]
pub async fn run_status_commands(
    commands: Vec<StatusCommand>,
    transport: Arc<dyn DeviceTransport>,
    publisher: &dyn ErrorPublisher,
) -> StatusResult<Vec<StatusResponse>> {
    if commands.is_empty() {
        return Err(StatusError::NoCommands);
    }

    let mut by_device: BTreeMap<String, Vec<StatusCommand>> = BTreeMap::new();
    for command in commands {
        by_device
            .entry(command.device.name.clone())
            .or_default()
            .push(command);
    }
    debug!(devices = by_device.len(), "Querying devices");

    let mut pending = Vec::with_capacity(by_device.len());
    let mut handles = Vec::with_capacity(by_device.len());
    for (device, commands) in by_device {
        let transport = transport.clone();
        let task_commands = commands.clone();
        handles.push(tokio::spawn(async move {
            query_device(&task_commands, transport.as_ref()).await
        }));
        pending.push((device, commands));
    }

    // Barrier: every device task has finished past this point
    let results = futures::future::join_all(handles).await;

    let mut responses = Vec::new();
    for ((device, commands), result) in pending.into_iter().zip(results) {
        match result {
            Ok(device_responses) => responses.extend(device_responses),
            Err(e) => {
                error!(%device, error = %e, "Status task did not complete");
                let message = format!("status task for {} did not complete: {}", device, e);
                responses.extend(
                    commands
                        .iter()
                        .map(|command| StatusResponse::failed(command, message.clone())),
                );
            }
        }
    }

    for response in responses.iter().filter(|r| r.is_error()) {
        let message = format!(
            "Error querying status for destination: {}: {}",
            response.destination.full_name(),
            response.error.as_deref().unwrap_or_default()
        );
        publisher.publish_error(&message, ErrorCause::Internal);
    }

    Ok(responses)
}

async fn query_device(
    commands: &[StatusCommand],
    transport: &dyn DeviceTransport,
) -> Vec<StatusResponse> {
    let mut responses = Vec::with_capacity(commands.len());
    for command in commands {
        responses.push(query(command, transport).await);
    }
    responses
}

async fn query(command: &StatusCommand, transport: &dyn DeviceTransport) -> StatusResponse {
    let endpoint = match build_endpoint(
        &command.action.endpoint,
        &command.device.address,
        &command.parameters,
    ) {
        Ok(endpoint) => endpoint,
        Err(e) => return StatusResponse::failed(command, e.to_string()),
    };
    let url = format!("{}{}", command.action.microservice, endpoint);

    let body = match transport.get(&url).await {
        Ok(body) => body,
        Err(e) => {
            warn!(device = %command.device.name, error = %e, "Status query failed");
            return StatusResponse::failed(command, e.to_string());
        }
    };

    match parse_status(&body) {
        Ok(status) => StatusResponse::ok(command, status),
        Err(reason) => {
            warn!(device = %command.device.name, %url, %reason, "Unusable status response");
            StatusResponse::failed(command, format!("bad status response from {}: {}", url, reason))
        }
    }
}

fn parse_status(body: &str) -> Result<StatusMap, String> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields.into_iter().collect()),
        Ok(_) => Err("expected a JSON object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}
