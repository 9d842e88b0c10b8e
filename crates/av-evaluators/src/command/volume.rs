//! Audio level

use async_trait::async_trait;
use av_core::{Action, PublicRoom};
use av_evaluator_registry::{
    CommandEvaluator, EvaluationContext, EvaluatorError, EvaluatorKey, EvaluatorResult,
};

use super::{room_wide_actions, validate_parameter_count};

const ACTION: &str = EvaluatorKey::SetVolume.as_str();

/// Highest accepted volume level
pub const MAX_VOLUME: i64 = 100;

/// Sets the volume of audio devices
pub struct SetVolume;

#[async_trait]
impl CommandEvaluator for SetVolume {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        desired: &PublicRoom,
    ) -> EvaluatorResult<Vec<Action>> {
        let mut actions = Vec::new();

        if let Some(level) = desired.volume {
            actions.extend(room_wide_actions(
                ACTION,
                ctx.room.audio_devices(),
                &[level.to_string()],
            ));
        }

        for audio in &desired.audio_devices {
            if let Some(level) = audio.volume {
                let device = ctx.get_device(&audio.name).await?;
                actions.push(Action::device_specific(
                    ACTION,
                    device,
                    vec![level.to_string()],
                ));
            }
        }

        Ok(actions)
    }

    fn validate(&self, actions: &[Action]) -> EvaluatorResult<()> {
        validate_parameter_count(actions, 1)?;

        for action in actions {
            let level = action.parameters[0].parse::<i64>().ok();
            if !level.is_some_and(|l| (0..=MAX_VOLUME).contains(&l)) {
                return Err(EvaluatorError::InvalidAction {
                    action: action.action.clone(),
                    device: action.device.name.clone(),
                    reason: format!(
                        "volume must be between 0 and {}, got {}",
                        MAX_VOLUME, action.parameters[0]
                    ),
                });
            }
        }
        Ok(())
    }

    fn incompatible_actions(&self) -> &[&'static str] {
        // A device-specific level replaces the room-wide one
        &[ACTION]
    }
}
