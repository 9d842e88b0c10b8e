//! Built-in status evaluators
//!
//! Each evaluator queries the device command named after its own key
//! (`STATUS_Power`, `STATUS_Input`, ...) and translates the raw key/value
//! pairs the control microservice returns into public status fields.

mod device;
mod input;

pub use device::{DeviceStatus, ValueKind};
pub use input::{InputStatus, VideoSwitcherInputStatus, VIDEO_SWITCHER_ROLE};

use av_core::Device;
use av_evaluator_registry::EvaluatorError;
use serde_json::Value;

fn interpretation_error(
    key: &str,
    value: &Value,
    device: &Device,
    reason: impl Into<String>,
) -> EvaluatorError {
    EvaluatorError::Interpretation {
        key: key.to_string(),
        value: value.to_string(),
        device: device.name.clone(),
        reason: reason.into(),
    }
}

/// Map a port name reported by `source` to the device feeding that port
fn source_for_port(
    key: &str,
    value: &Value,
    source: &Device,
    destination: &Device,
) -> Result<Value, EvaluatorError> {
    let port_name = value
        .as_str()
        .ok_or_else(|| interpretation_error(key, value, destination, "expected a port name"))?;

    source
        .port(port_name)
        .map(|p| Value::String(p.source.clone()))
        .ok_or_else(|| {
            interpretation_error(
                key,
                value,
                destination,
                format!("{} has no port named {}", source.name, port_name),
            )
        })
}
