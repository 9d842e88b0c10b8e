//! Input switching

use async_trait::async_trait;
use av_core::{Action, Device, PublicRoom};
use av_evaluator_registry::{
    CommandEvaluator, EvaluationContext, EvaluatorError, EvaluatorKey, EvaluatorResult,
};
use tracing::{debug, warn};

use super::validate_parameter_count;

const ACTION: &str = EvaluatorKey::ChangeInput.as_str();

/// Routes a source device to displays and audio devices
///
/// The action parameter is the name of the target device's port that is fed
/// by the requested source.
pub struct ChangeInput;

impl ChangeInput {
    fn room_wide<'a>(
        targets: impl Iterator<Item = &'a Device>,
        input: &str,
        actions: &mut Vec<Action>,
    ) {
        for device in targets.filter(|d| d.has_command(ACTION)) {
            match device.port_from_source(input) {
                Some(port) => actions.push(Action::room_wide(
                    ACTION,
                    device.clone(),
                    vec![port.name.clone()],
                )),
                None => warn!(device = %device.name, input, "No port fed by requested input"),
            }
        }
    }

    async fn device_specific(
        ctx: &EvaluationContext<'_>,
        name: &str,
        input: &str,
    ) -> EvaluatorResult<Action> {
        let device = ctx.get_device(name).await?;
        let port = device
            .port_from_source(input)
            .ok_or_else(|| EvaluatorError::InvalidAction {
                action: ACTION.to_string(),
                device: device.name.clone(),
                reason: format!("no port is fed by {}", input),
            })?
            .name
            .clone();
        Ok(Action::device_specific(ACTION, device, vec![port]))
    }
}

#[async_trait]
impl CommandEvaluator for ChangeInput {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        desired: &PublicRoom,
    ) -> EvaluatorResult<Vec<Action>> {
        let mut actions = Vec::new();

        if let Some(input) = &desired.current_video_input {
            Self::room_wide(ctx.room.displays(), input, &mut actions);
        }

        // Displays already follow the video input
        if let Some(input) = &desired.current_audio_input {
            Self::room_wide(
                ctx.room.audio_devices().filter(|d| !d.display),
                input,
                &mut actions,
            );
        }

        let requested: Vec<(&str, &str)> = desired
            .displays
            .iter()
            .filter_map(|d| Some((d.name.as_str(), d.input.as_deref()?)))
            .chain(
                desired
                    .audio_devices
                    .iter()
                    .filter_map(|a| Some((a.name.as_str(), a.input.as_deref()?))),
            )
            .collect();

        // A device listed as both display and audio device switches once;
        // differing inputs are left for reconciliation to reject
        let mut seen: Vec<(&str, &str)> = Vec::new();
        for (name, input) in requested {
            if seen
                .iter()
                .any(|(n, i)| n.eq_ignore_ascii_case(name) && i.eq_ignore_ascii_case(input))
            {
                continue;
            }
            seen.push((name, input));
            actions.push(Self::device_specific(ctx, name, input).await?);
        }

        debug!(count = actions.len(), "Evaluated input changes");
        Ok(actions)
    }

    fn validate(&self, actions: &[Action]) -> EvaluatorResult<()> {
        validate_parameter_count(actions, 1)?;

        if let Some(action) = actions.iter().find(|a| a.parameters[0].is_empty()) {
            return Err(EvaluatorError::InvalidAction {
                action: action.action.clone(),
                device: action.device.name.clone(),
                reason: "empty port name".to_string(),
            });
        }
        Ok(())
    }

    fn incompatible_actions(&self) -> &[&'static str] {
        // A device-specific input replaces the room-wide one
        &[ACTION]
    }
}
