//! Built-in command evaluators
//!
//! Room-wide fields of the desired state fan out to every room device that
//! supports the command. Entries in the `displays` and `audioDevices` lists
//! produce device-specific actions for the named device, resolved through
//! the evaluation context.

mod blank;
mod input;
mod mute;
mod power;
mod volume;

pub use blank::{BlankDisplay, UnblankDisplay};
pub use input::ChangeInput;
pub use mute::{Mute, UnMute};
pub use power::{PowerOn, Standby};
pub use volume::SetVolume;

use av_core::{Action, Device};
use av_evaluator_registry::{EvaluationContext, EvaluatorError, EvaluatorResult};

/// Room-wide actions for every target that supports the command
fn room_wide_actions<'a>(
    action: &str,
    targets: impl Iterator<Item = &'a Device>,
    parameters: &[String],
) -> Vec<Action> {
    targets
        .filter(|d| d.has_command(action))
        .map(|d| Action::room_wide(action, d.clone(), parameters.to_vec()))
        .collect()
}

/// Device-specific actions for the named devices
///
/// A name listed twice (for example as both a display and an audio device)
/// produces a single action.
async fn device_specific_actions(
    ctx: &EvaluationContext<'_>,
    action: &str,
    names: &[&str],
) -> EvaluatorResult<Vec<Action>> {
    let mut seen: Vec<String> = Vec::new();
    let mut actions = Vec::new();

    for &name in names {
        if seen.iter().any(|s| s.eq_ignore_ascii_case(name)) {
            continue;
        }
        seen.push(name.to_string());

        let device = ctx.get_device(name).await?;
        actions.push(Action::device_specific(action, device, Vec::new()));
    }

    Ok(actions)
}

/// Check that every action carries exactly `expected` parameters
fn validate_parameter_count(actions: &[Action], expected: usize) -> EvaluatorResult<()> {
    for action in actions {
        if action.parameters.len() != expected {
            return Err(EvaluatorError::InvalidAction {
                action: action.action.clone(),
                device: action.device.name.clone(),
                reason: format!(
                    "expected {} parameter(s), got {}",
                    expected,
                    action.parameters.len()
                ),
            });
        }
    }
    Ok(())
}
