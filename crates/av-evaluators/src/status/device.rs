//! Single-value device status (power, blanking, muting, volume)

use av_core::{Device, Room, StatusCommand};
use av_evaluator_registry::{
    EvaluatorKey, EvaluatorResult, StatusEvaluator,
};
use serde_json::Value;
use tracing::trace;

use super::interpretation_error;

/// Expected JSON type of a status value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Bool,
    Integer,
}

impl ValueKind {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            ValueKind::String => value.is_string(),
            ValueKind::Bool => value.is_boolean(),
            ValueKind::Integer => value.is_i64() || value.is_u64(),
        }
    }
}

/// Which room devices an evaluator queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    All,
    Displays,
    AudioDevices,
}

/// Queries one status field on each device that supports it
///
/// Results are attributed to the queried device itself.
#[derive(Debug, Clone)]
pub struct DeviceStatus {
    key: EvaluatorKey,
    field: &'static str,
    kind: ValueKind,
    scope: Scope,
}

impl DeviceStatus {
    pub fn power() -> Self {
        Self {
            key: EvaluatorKey::StatusPower,
            field: "power",
            kind: ValueKind::String,
            scope: Scope::All,
        }
    }

    pub fn blanked() -> Self {
        Self {
            key: EvaluatorKey::StatusBlanked,
            field: "blanked",
            kind: ValueKind::Bool,
            scope: Scope::Displays,
        }
    }

    pub fn muted() -> Self {
        Self {
            key: EvaluatorKey::StatusMuted,
            field: "muted",
            kind: ValueKind::Bool,
            scope: Scope::AudioDevices,
        }
    }

    pub fn volume() -> Self {
        Self {
            key: EvaluatorKey::StatusVolume,
            field: "volume",
            kind: ValueKind::Integer,
            scope: Scope::AudioDevices,
        }
    }

    fn in_scope(&self, device: &Device) -> bool {
        match self.scope {
            Scope::All => true,
            Scope::Displays => device.display,
            Scope::AudioDevices => device.audio_device,
        }
    }
}

impl StatusEvaluator for DeviceStatus {
    fn get_devices(&self, room: &Room) -> EvaluatorResult<Vec<Device>> {
        Ok(room
            .devices
            .iter()
            .filter(|d| self.in_scope(d) && d.has_command(self.key.as_str()))
            .cloned()
            .collect())
    }

    fn generate_commands(&self, devices: &[Device]) -> EvaluatorResult<Vec<StatusCommand>> {
        let commands: Vec<_> = devices
            .iter()
            .filter_map(|d| {
                d.command(self.key.as_str())
                    .map(|c| StatusCommand::direct(c.clone(), d.clone(), self.key))
            })
            .collect();

        trace!(key = %self.key, count = commands.len(), "Generated status commands");
        Ok(commands)
    }

    fn evaluate_response(
        &self,
        key: &str,
        value: &Value,
        _source: &Device,
        destination: &Device,
    ) -> EvaluatorResult<(String, Value)> {
        if !key.eq_ignore_ascii_case(self.field) {
            return Err(interpretation_error(
                key,
                value,
                destination,
                format!("{} reports only {}", self.key, self.field),
            ));
        }

        if !self.kind.accepts(value) {
            return Err(interpretation_error(
                key,
                value,
                destination,
                format!("expected a {:?} value", self.kind),
            ));
        }

        Ok((self.field.to_string(), value.clone()))
    }
}
