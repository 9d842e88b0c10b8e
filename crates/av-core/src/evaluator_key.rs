//! Evaluator keys
//!
//! Every evaluator is registered under an enumerated key. Command evaluator
//! keys double as action names; status evaluator keys carry the `STATUS_`
//! flag prefix.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix tagging a key as a status evaluator
pub const STATUS_FLAG: &str = "STATUS";

/// Identifier of a registered evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EvaluatorKey {
    PowerOn,
    Standby,
    ChangeInput,
    BlankDisplay,
    UnblankDisplay,
    Mute,
    UnMute,
    SetVolume,
    StatusPower,
    StatusBlanked,
    StatusMuted,
    StatusVolume,
    StatusInput,
    StatusInputVideoSwitcher,
}

/// A string did not name a known evaluator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown evaluator: {0}")]
pub struct UnknownEvaluatorKey(pub String);

impl EvaluatorKey {
    pub const ALL: [EvaluatorKey; 14] = [
        EvaluatorKey::PowerOn,
        EvaluatorKey::Standby,
        EvaluatorKey::ChangeInput,
        EvaluatorKey::BlankDisplay,
        EvaluatorKey::UnblankDisplay,
        EvaluatorKey::Mute,
        EvaluatorKey::UnMute,
        EvaluatorKey::SetVolume,
        EvaluatorKey::StatusPower,
        EvaluatorKey::StatusBlanked,
        EvaluatorKey::StatusMuted,
        EvaluatorKey::StatusVolume,
        EvaluatorKey::StatusInput,
        EvaluatorKey::StatusInputVideoSwitcher,
    ];

    /// The registry/action name of this key
    pub const fn as_str(&self) -> &'static str {
        match self {
            EvaluatorKey::PowerOn => "PowerOn",
            EvaluatorKey::Standby => "Standby",
            EvaluatorKey::ChangeInput => "ChangeInput",
            EvaluatorKey::BlankDisplay => "BlankDisplay",
            EvaluatorKey::UnblankDisplay => "UnblankDisplay",
            EvaluatorKey::Mute => "Mute",
            EvaluatorKey::UnMute => "UnMute",
            EvaluatorKey::SetVolume => "SetVolume",
            EvaluatorKey::StatusPower => "STATUS_Power",
            EvaluatorKey::StatusBlanked => "STATUS_Blanked",
            EvaluatorKey::StatusMuted => "STATUS_Muted",
            EvaluatorKey::StatusVolume => "STATUS_Volume",
            EvaluatorKey::StatusInput => "STATUS_Input",
            EvaluatorKey::StatusInputVideoSwitcher => "STATUS_InputVideoSwitcher",
        }
    }

    /// Whether this key names a status evaluator
    pub fn is_status(&self) -> bool {
        self.as_str().starts_with(STATUS_FLAG)
    }
}

impl FromStr for EvaluatorKey {
    type Err = UnknownEvaluatorKey;

    /// Parse a key (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownEvaluatorKey(s.to_string()))
    }
}

impl TryFrom<String> for EvaluatorKey {
    type Error = UnknownEvaluatorKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EvaluatorKey> for String {
    fn from(key: EvaluatorKey) -> Self {
        key.as_str().to_string()
    }
}

impl fmt::Display for EvaluatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
