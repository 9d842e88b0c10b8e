//! Power evaluators

use async_trait::async_trait;
use av_core::{Action, PublicRoom};
use av_evaluator_registry::{
    CommandEvaluator, EvaluationContext, EvaluatorKey, EvaluatorResult,
};
use tracing::debug;

use super::{device_specific_actions, room_wide_actions, validate_parameter_count};

fn wants(power: Option<&String>, state: &str) -> bool {
    power.is_some_and(|p| p.eq_ignore_ascii_case(state))
}

async fn evaluate_power(
    ctx: &EvaluationContext<'_>,
    desired: &PublicRoom,
    state: &str,
    action: &str,
) -> EvaluatorResult<Vec<Action>> {
    let mut actions = Vec::new();

    if wants(desired.power.as_ref(), state) {
        actions.extend(room_wide_actions(action, ctx.room.devices.iter(), &[]));
    }

    let named: Vec<&str> = desired
        .displays
        .iter()
        .filter(|d| wants(d.power.as_ref(), state))
        .map(|d| d.name.as_str())
        .chain(
            desired
                .audio_devices
                .iter()
                .filter(|a| wants(a.power.as_ref(), state))
                .map(|a| a.name.as_str()),
        )
        .collect();
    actions.extend(device_specific_actions(ctx, action, &named).await?);

    debug!(action, count = actions.len(), "Evaluated power");
    Ok(actions)
}

/// Powers devices on
pub struct PowerOn;

#[async_trait]
impl CommandEvaluator for PowerOn {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        desired: &PublicRoom,
    ) -> EvaluatorResult<Vec<Action>> {
        evaluate_power(ctx, desired, "on", EvaluatorKey::PowerOn.as_str()).await
    }

    fn validate(&self, actions: &[Action]) -> EvaluatorResult<()> {
        validate_parameter_count(actions, 0)
    }

    fn incompatible_actions(&self) -> &[&'static str] {
        &["Standby"]
    }
}

/// Puts devices into standby
pub struct Standby;

#[async_trait]
impl CommandEvaluator for Standby {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        desired: &PublicRoom,
    ) -> EvaluatorResult<Vec<Action>> {
        evaluate_power(ctx, desired, "standby", EvaluatorKey::Standby.as_str()).await
    }

    fn validate(&self, actions: &[Action]) -> EvaluatorResult<()> {
        validate_parameter_count(actions, 0)
    }

    fn incompatible_actions(&self) -> &[&'static str] {
        &["PowerOn"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, FixedDirectory};
    use av_core::{AudioDevice, Display};
    use av_evaluator_registry::EvaluatorError;

    #[tokio::test]
    async fn test_room_wide_power_on() {
        let room = testing::room();
        let directory = FixedDirectory::default();
        let ctx = EvaluationContext::new(&room, &directory);
        let desired = PublicRoom {
            power: Some("on".to_string()),
            ..Default::default()
        };

        let actions = PowerOn.evaluate(&ctx, &desired).await.unwrap();

        let names: Vec<_> = actions.iter().map(|a| a.device.name.as_str()).collect();
        assert_eq!(names, vec!["D1", "D2", "AMP1"]);
        assert!(actions.iter().all(|a| !a.device_specific));
        assert!(actions.iter().all(|a| a.action == "PowerOn"));
    }

    #[tokio::test]
    async fn test_device_specific_standby() {
        let room = testing::room();
        let directory = FixedDirectory::default();
        let ctx = EvaluationContext::new(&room, &directory);
        let desired = PublicRoom {
            displays: vec![Display {
                name: "d2".to_string(),
                power: Some("standby".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let actions = Standby.evaluate(&ctx, &desired).await.unwrap();

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].device.name, "D2");
        assert!(actions[0].device_specific);
        assert!(PowerOn.evaluate(&ctx, &desired).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_device_listed_twice_yields_one_action() {
        let room = testing::room();
        let directory = FixedDirectory::default();
        let ctx = EvaluationContext::new(&room, &directory);
        let desired = PublicRoom {
            displays: vec![Display {
                name: "AMP1".to_string(),
                power: Some("on".to_string()),
                ..Default::default()
            }],
            audio_devices: vec![AudioDevice {
                name: "amp1".to_string(),
                power: Some("on".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let actions = PowerOn.evaluate(&ctx, &desired).await.unwrap();
        assert_eq!(actions.len(), 1);
    }

    #[tokio::test]
    async fn test_device_outside_room_comes_from_directory() {
        let room = testing::room();
        let directory = FixedDirectory {
            devices: vec![testing::display(9, "D9")],
        };
        let ctx = EvaluationContext::new(&room, &directory);
        let desired = PublicRoom {
            displays: vec![Display {
                name: "D9".to_string(),
                power: Some("on".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let actions = PowerOn.evaluate(&ctx, &desired).await.unwrap();
        assert_eq!(actions[0].device.id, 9);
    }

    #[tokio::test]
    async fn test_unknown_device_is_directory_error() {
        let room = testing::room();
        let directory = FixedDirectory::default();
        let ctx = EvaluationContext::new(&room, &directory);
        let desired = PublicRoom {
            displays: vec![Display {
                name: "Ghost".to_string(),
                power: Some("on".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let result = PowerOn.evaluate(&ctx, &desired).await;
        assert!(matches!(result, Err(EvaluatorError::Directory(_))));
    }

    #[test]
    fn test_validate_rejects_parameters() {
        let action = Action::room_wide("PowerOn", testing::display(1, "D1"), vec!["x".to_string()]);
        assert!(PowerOn.validate(&[action]).is_err());
    }
}
