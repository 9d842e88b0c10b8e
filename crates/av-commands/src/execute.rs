//! Action execution

use av_core::{build_endpoint, Action, DeviceTransport, EndpointError, ExecutionReport};
use tracing::{debug, instrument, warn};

use crate::error::{CommandError, CommandResult};
use crate::reconcile::Reconciliation;

/// Execute every action that was not overridden, in list order
///
/// A device that lacks the named command aborts the run: nothing after it
/// is sent. A transport failure does not; it is recorded in that action's
/// report and the run continues.
#[instrument(skip_all, fields(count = actions.len()))]
pub async fn execute(
    actions: &[Action],
    reconciliation: &Reconciliation,
    transport: &dyn DeviceTransport,
) -> CommandResult<Vec<ExecutionReport>> {
    let mut reports = Vec::with_capacity(actions.len());

    for (index, action) in actions.iter().enumerate() {
        if reconciliation.is_overridden(index) {
            debug!(action = %action.action, device = %action.device.name, "Skipping overridden action");
            continue;
        }

        let url = action_url(action)?;
        debug!(action = %action.action, device = %action.device.name, %url, "Sending command");

        match transport.get(&url).await {
            Ok(_) => reports.push(ExecutionReport::succeeded(action)),
            Err(e) => {
                warn!(action = %action.action, device = %action.device.name, error = %e, "Command failed");
                reports.push(ExecutionReport::failed(action, e.to_string()));
            }
        }
    }

    Ok(reports)
}

/// Resolve the full URL for an action from its device's command
fn action_url(action: &Action) -> CommandResult<String> {
    let device = &action.device;
    let command = device
        .command(&action.action)
        .ok_or_else(|| CommandError::CommandNotFound {
            action: action.action.clone(),
            device: device.name.clone(),
        })?;

    let endpoint = build_endpoint(&command.endpoint, &device.address, &action.parameters)
        .map_err(|e| match e {
            EndpointError::ParameterCount {
                expected, available, ..
            } => CommandError::ParameterCount {
                action: action.action.clone(),
                device: device.name.clone(),
                expected,
                available,
            },
        })?;

    Ok(format!("{}{}", command.microservice, endpoint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use av_core::{Command, Device, TransportError};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DeviceTransport for Recorder {
        async fn get(&self, url: &str) -> Result<String, TransportError> {
            self.urls.lock().unwrap().push(url.to_string());
            if url.contains("broken") {
                return Err(TransportError::Status {
                    url: url.to_string(),
                    status: 500,
                });
            }
            Ok("{}".to_string())
        }
    }

    fn amp(name: &str, address: &str) -> Device {
        Device {
            id: 3,
            name: name.to_string(),
            address: address.to_string(),
            room: "1110".to_string(),
            building: "ITB".to_string(),
            commands: vec![
                Command {
                    name: "SetVolume".to_string(),
                    endpoint: "/:address/volume/set/:level".to_string(),
                    microservice: "http://adcp:8012".to_string(),
                },
                Command {
                    name: "Mute".to_string(),
                    endpoint: "/:address/volume/mute".to_string(),
                    microservice: "http://adcp:8012".to_string(),
                },
            ],
            ports: vec![],
            roles: vec![],
            display: false,
            audio_device: true,
        }
    }

    #[tokio::test]
    async fn test_builds_url_from_template() {
        let transport = Recorder::default();
        let actions = vec![Action::room_wide(
            "SetVolume",
            amp("AMP1", "10.0.0.3"),
            vec!["45".to_string()],
        )];

        let reports = execute(&actions, &Reconciliation::default(), &transport)
            .await
            .unwrap();

        assert_eq!(reports, vec![ExecutionReport::succeeded(&actions[0])]);
        assert_eq!(
            *transport.urls.lock().unwrap(),
            vec!["http://adcp:8012/10.0.0.3/volume/set/45".to_string()]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_continues() {
        let transport = Recorder::default();
        let actions = vec![
            Action::room_wide("Mute", amp("AMP1", "broken"), vec![]),
            Action::room_wide("Mute", amp("AMP2", "10.0.0.4"), vec![]),
        ];

        let reports = execute(&actions, &Reconciliation::default(), &transport)
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert!(!reports[0].success);
        assert!(reports[0].error.as_deref().unwrap().contains("500"));
        assert!(reports[1].success);
    }

    #[tokio::test]
    async fn test_missing_command_stops_execution() {
        let transport = Recorder::default();
        let actions = vec![
            Action::room_wide("Mute", amp("AMP1", "10.0.0.3"), vec![]),
            Action::room_wide("PowerOn", amp("AMP1", "10.0.0.3"), vec![]),
            Action::room_wide("Mute", amp("AMP2", "10.0.0.4"), vec![]),
        ];

        let err = execute(&actions, &Reconciliation::default(), &transport)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CommandError::CommandNotFound { ref action, ref device } if action == "PowerOn" && device == "AMP1"
        ));
        assert_eq!(transport.urls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_too_many_parameters() {
        let transport = Recorder::default();
        let actions = vec![Action::room_wide(
            "Mute",
            amp("AMP1", "10.0.0.3"),
            vec!["true".to_string()],
        )];

        let err = execute(&actions, &Reconciliation::default(), &transport)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CommandError::ParameterCount { expected: 1, available: 0, .. }
        ));
        assert!(transport.urls.lock().unwrap().is_empty());
    }
}
