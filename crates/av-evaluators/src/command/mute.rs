//! Audio muting

use async_trait::async_trait;
use av_core::{Action, PublicRoom};
use av_evaluator_registry::{
    CommandEvaluator, EvaluationContext, EvaluatorKey, EvaluatorResult,
};

use super::{device_specific_actions, room_wide_actions, validate_parameter_count};

async fn evaluate_mute(
    ctx: &EvaluationContext<'_>,
    desired: &PublicRoom,
    muted: bool,
    action: &str,
) -> EvaluatorResult<Vec<Action>> {
    let mut actions = Vec::new();

    if desired.muted == Some(muted) {
        actions.extend(room_wide_actions(action, ctx.room.audio_devices(), &[]));
    }

    let named: Vec<&str> = desired
        .audio_devices
        .iter()
        .filter(|a| a.muted == Some(muted))
        .map(|a| a.name.as_str())
        .collect();
    actions.extend(device_specific_actions(ctx, action, &named).await?);

    Ok(actions)
}

/// Mutes audio devices
pub struct Mute;

#[async_trait]
impl CommandEvaluator for Mute {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        desired: &PublicRoom,
    ) -> EvaluatorResult<Vec<Action>> {
        evaluate_mute(ctx, desired, true, EvaluatorKey::Mute.as_str()).await
    }

    fn validate(&self, actions: &[Action]) -> EvaluatorResult<()> {
        validate_parameter_count(actions, 0)
    }

    fn incompatible_actions(&self) -> &[&'static str] {
        &["UnMute"]
    }
}

/// Unmutes audio devices
pub struct UnMute;

#[async_trait]
impl CommandEvaluator for UnMute {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        desired: &PublicRoom,
    ) -> EvaluatorResult<Vec<Action>> {
        evaluate_mute(ctx, desired, false, EvaluatorKey::UnMute.as_str()).await
    }

    fn validate(&self, actions: &[Action]) -> EvaluatorResult<()> {
        validate_parameter_count(actions, 0)
    }

    fn incompatible_actions(&self) -> &[&'static str] {
        &["Mute"]
    }
}
