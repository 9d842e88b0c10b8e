//! Built-in evaluators
//!
//! Command evaluators:
//!
//! - `PowerOn` / `Standby` - room or per-device power
//! - `ChangeInput` - route a source device to displays and audio devices
//! - `BlankDisplay` / `UnblankDisplay` - display blanking
//! - `Mute` / `UnMute` - audio muting
//! - `SetVolume` - audio level (0-100)
//!
//! Status evaluators:
//!
//! - `STATUS_Power`, `STATUS_Blanked`, `STATUS_Muted`, `STATUS_Volume`
//! - `STATUS_Input` - a device's own input, mapped to the source device
//! - `STATUS_InputVideoSwitcher` - display inputs read off a video switcher

pub mod command;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

use av_evaluator_registry::{EvaluatorKey, Registry, RegistryResult};

/// Build a registry holding every built-in evaluator
pub fn default_registry() -> RegistryResult<Registry> {
    let mut builder = Registry::builder();

    builder
        .register_command(EvaluatorKey::PowerOn, command::PowerOn)?
        .register_command(EvaluatorKey::Standby, command::Standby)?
        .register_command(EvaluatorKey::ChangeInput, command::ChangeInput)?
        .register_command(EvaluatorKey::BlankDisplay, command::BlankDisplay)?
        .register_command(EvaluatorKey::UnblankDisplay, command::UnblankDisplay)?
        .register_command(EvaluatorKey::Mute, command::Mute)?
        .register_command(EvaluatorKey::UnMute, command::UnMute)?
        .register_command(EvaluatorKey::SetVolume, command::SetVolume)?;

    builder
        .register_status(EvaluatorKey::StatusPower, status::DeviceStatus::power())?
        .register_status(EvaluatorKey::StatusBlanked, status::DeviceStatus::blanked())?
        .register_status(EvaluatorKey::StatusMuted, status::DeviceStatus::muted())?
        .register_status(EvaluatorKey::StatusVolume, status::DeviceStatus::volume())?
        .register_status(EvaluatorKey::StatusInput, status::InputStatus)?
        .register_status(
            EvaluatorKey::StatusInputVideoSwitcher,
            status::VideoSwitcherInputStatus,
        )?;

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_covers_every_key() {
        let registry = default_registry().unwrap();

        assert_eq!(registry.len(), EvaluatorKey::ALL.len());
        for key in EvaluatorKey::ALL {
            if key.is_status() {
                assert!(registry.status(key).is_ok(), "{key} missing");
            } else {
                assert!(registry.command(key).is_ok(), "{key} missing");
            }
        }
    }
}
