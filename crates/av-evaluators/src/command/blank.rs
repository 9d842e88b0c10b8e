//! Display blanking

use async_trait::async_trait;
use av_core::{Action, PublicRoom};
use av_evaluator_registry::{
    CommandEvaluator, EvaluationContext, EvaluatorKey, EvaluatorResult,
};

use super::{device_specific_actions, room_wide_actions, validate_parameter_count};

async fn evaluate_blanking(
    ctx: &EvaluationContext<'_>,
    desired: &PublicRoom,
    blanked: bool,
    action: &str,
) -> EvaluatorResult<Vec<Action>> {
    let mut actions = Vec::new();

    if desired.blanked == Some(blanked) {
        actions.extend(room_wide_actions(action, ctx.room.displays(), &[]));
    }

    let named: Vec<&str> = desired
        .displays
        .iter()
        .filter(|d| d.blanked == Some(blanked))
        .map(|d| d.name.as_str())
        .collect();
    actions.extend(device_specific_actions(ctx, action, &named).await?);

    Ok(actions)
}

/// Blanks displays
pub struct BlankDisplay;

#[async_trait]
impl CommandEvaluator for BlankDisplay {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        desired: &PublicRoom,
    ) -> EvaluatorResult<Vec<Action>> {
        evaluate_blanking(ctx, desired, true, EvaluatorKey::BlankDisplay.as_str()).await
    }

    fn validate(&self, actions: &[Action]) -> EvaluatorResult<()> {
        validate_parameter_count(actions, 0)
    }

    fn incompatible_actions(&self) -> &[&'static str] {
        &["UnblankDisplay"]
    }
}

/// Unblanks displays
pub struct UnblankDisplay;

#[async_trait]
impl CommandEvaluator for UnblankDisplay {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        desired: &PublicRoom,
    ) -> EvaluatorResult<Vec<Action>> {
        evaluate_blanking(ctx, desired, false, EvaluatorKey::UnblankDisplay.as_str()).await
    }

    fn validate(&self, actions: &[Action]) -> EvaluatorResult<()> {
        validate_parameter_count(actions, 0)
    }

    fn incompatible_actions(&self) -> &[&'static str] {
        &["BlankDisplay"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, FixedDirectory};
    use av_core::Display;

    #[tokio::test]
    async fn test_room_blank_targets_displays_only() {
        let room = testing::room();
        let directory = FixedDirectory::default();
        let ctx = EvaluationContext::new(&room, &directory);
        let desired = PublicRoom {
            blanked: Some(true),
            ..Default::default()
        };

        let actions = BlankDisplay.evaluate(&ctx, &desired).await.unwrap();
        let names: Vec<_> = actions.iter().map(|a| a.device.name.as_str()).collect();
        assert_eq!(names, vec!["D1", "D2"]);
        assert!(UnblankDisplay.evaluate(&ctx, &desired).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_device_specific_unblank_with_room_blank() {
        let room = testing::room();
        let directory = FixedDirectory::default();
        let ctx = EvaluationContext::new(&room, &directory);
        let desired = PublicRoom {
            blanked: Some(true),
            displays: vec![Display {
                name: "D1".to_string(),
                blanked: Some(false),
                ..Default::default()
            }],
            ..Default::default()
        };

        let unblank = UnblankDisplay.evaluate(&ctx, &desired).await.unwrap();
        assert_eq!(unblank.len(), 1);
        assert!(unblank[0].device_specific);
        assert_eq!(unblank[0].device.name, "D1");
    }
}
