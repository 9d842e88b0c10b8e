//! Input status
//!
//! Devices report the name of their active input port. The public value is
//! the name of the device feeding that port.

use av_core::{Device, Room, StatusCommand};
use av_evaluator_registry::{EvaluatorKey, EvaluatorResult, StatusEvaluator};
use serde_json::Value;
use tracing::{debug, trace};

use super::{interpretation_error, source_for_port};

/// Role marking a device as a video switcher
pub const VIDEO_SWITCHER_ROLE: &str = "VideoSwitcher";

const FIELD: &str = "input";

fn check_field(key: &str, value: &Value, destination: &Device) -> EvaluatorResult<()> {
    if key.eq_ignore_ascii_case(FIELD) {
        Ok(())
    } else {
        Err(interpretation_error(
            key,
            value,
            destination,
            "input status reports only input",
        ))
    }
}

/// Asks each device for its own active input
pub struct InputStatus;

impl StatusEvaluator for InputStatus {
    fn get_devices(&self, room: &Room) -> EvaluatorResult<Vec<Device>> {
        let command = EvaluatorKey::StatusInput.as_str();
        Ok(room
            .devices
            .iter()
            .filter(|d| (d.display || d.audio_device) && d.has_command(command))
            .cloned()
            .collect())
    }

    fn generate_commands(&self, devices: &[Device]) -> EvaluatorResult<Vec<StatusCommand>> {
        let key = EvaluatorKey::StatusInput;
        Ok(devices
            .iter()
            .filter_map(|d| {
                d.command(key.as_str())
                    .map(|c| StatusCommand::direct(c.clone(), d.clone(), key))
            })
            .collect())
    }

    fn evaluate_response(
        &self,
        key: &str,
        value: &Value,
        source: &Device,
        destination: &Device,
    ) -> EvaluatorResult<(String, Value)> {
        check_field(key, value, destination)?;
        Ok((FIELD.to_string(), source_for_port(key, value, source, destination)?))
    }
}

/// Reads display inputs off a video switcher
///
/// The switcher is queried once per output port, with the port name as the
/// command parameter. Each result is attributed to the display on that
/// output, and the switcher's input port is mapped to its source device.
pub struct VideoSwitcherInputStatus;

impl StatusEvaluator for VideoSwitcherInputStatus {
    /// Switchers in the room plus the displays they may feed
    fn get_devices(&self, room: &Room) -> EvaluatorResult<Vec<Device>> {
        let command = EvaluatorKey::StatusInputVideoSwitcher.as_str();
        Ok(room
            .devices
            .iter()
            .filter(|d| {
                d.display
                    || (d.has_role(VIDEO_SWITCHER_ROLE)
                        && (d.has_command(command)
                            || d.has_command(EvaluatorKey::StatusInput.as_str())))
            })
            .cloned()
            .collect())
    }

    fn generate_commands(&self, devices: &[Device]) -> EvaluatorResult<Vec<StatusCommand>> {
        let displays: Vec<&Device> = devices.iter().filter(|d| d.display).collect();
        let mut commands = Vec::new();

        for switcher in devices.iter().filter(|d| d.has_role(VIDEO_SWITCHER_ROLE)) {
            let Some(action) = switcher
                .command(EvaluatorKey::StatusInputVideoSwitcher.as_str())
                .or_else(|| switcher.command(EvaluatorKey::StatusInput.as_str()))
            else {
                continue;
            };

            for port in &switcher.ports {
                let Some(target) = displays
                    .iter()
                    .find(|d| d.name.eq_ignore_ascii_case(&port.destination))
                else {
                    continue;
                };

                trace!(switcher = %switcher.name, port = %port.name, display = %target.name, "Proxying input query");
                commands.push(StatusCommand {
                    action: action.clone(),
                    device: switcher.clone(),
                    destination: (*target).clone(),
                    parameters: vec![port.name.clone()],
                    generator: EvaluatorKey::StatusInputVideoSwitcher,
                });
            }
        }

        debug!(count = commands.len(), "Generated video switcher input queries");
        Ok(commands)
    }

    fn evaluate_response(
        &self,
        key: &str,
        value: &Value,
        source: &Device,
        destination: &Device,
    ) -> EvaluatorResult<(String, Value)> {
        check_field(key, value, destination)?;
        Ok((FIELD.to_string(), source_for_port(key, value, source, destination)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use serde_json::json;

    #[test]
    fn test_input_maps_port_to_source_device() {
        let d1 = testing::display(1, "D1");

        let (key, value) = InputStatus
            .evaluate_response("input", &json!("hdmi2"), &d1, &d1)
            .unwrap();
        assert_eq!(key, "input");
        assert_eq!(value, json!("VIA1"));

        assert!(InputStatus
            .evaluate_response("input", &json!("hdmi9"), &d1, &d1)
            .is_err());
        assert!(InputStatus
            .evaluate_response("input", &json!(3), &d1, &d1)
            .is_err());
    }

    #[test]
    fn test_input_skips_switchers() {
        let room = testing::room();
        let devices = InputStatus.get_devices(&room).unwrap();
        let names: Vec<_> = devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["D1", "D2", "AMP1"]);
    }

    #[test]
    fn test_switcher_queries_are_attributed_to_displays() {
        let room = testing::room();
        let evaluator = VideoSwitcherInputStatus;

        let devices = evaluator.get_devices(&room).unwrap();
        let commands = evaluator.generate_commands(&devices).unwrap();

        assert_eq!(commands.len(), 2);
        for (command, (display, port)) in commands.iter().zip([("D1", "out1"), ("D2", "out2")]) {
            assert_eq!(command.device.name, "SW1");
            assert_eq!(command.destination.name, display);
            assert!(command.destination.display);
            assert_eq!(command.parameters, vec![port]);
        }
    }

    #[test]
    fn test_switcher_response_uses_switcher_ports() {
        let sw = testing::switcher(4, "SW1");
        let d2 = testing::display(2, "D2");

        let (_, value) = VideoSwitcherInputStatus
            .evaluate_response("input", &json!("in1"), &sw, &d2)
            .unwrap();
        assert_eq!(value, json!("HDMIIn"));
    }
}
