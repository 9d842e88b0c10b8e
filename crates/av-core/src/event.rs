//! Events published to operators

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Context;

/// Payload of an event, tied to one event type name
pub trait EventData: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const EVENT_TYPE: &'static str;
}

/// An event as carried by the bus
///
/// Events travel with a JSON payload; [`Event::decode`] recovers the typed
/// form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event<T = Value> {
    pub event_type: String,
    pub data: T,
    pub time_fired: DateTime<Utc>,
    pub context: Context,
}

impl<T: EventData> Event<T> {
    /// Stamp a payload with its type name and the current time
    pub fn new(data: T, context: Context) -> Self {
        Self {
            event_type: T::EVENT_TYPE.to_string(),
            data,
            time_fired: Utc::now(),
            context,
        }
    }

    /// Convert to the JSON-payload form
    pub fn encode(self) -> Result<Event<Value>, serde_json::Error> {
        Ok(Event {
            data: serde_json::to_value(&self.data)?,
            event_type: self.event_type,
            time_fired: self.time_fired,
            context: self.context,
        })
    }
}

impl Event<Value> {
    /// Recover a typed event; `None` if the type name or payload does not match
    pub fn decode<T: EventData>(&self) -> Option<Event<T>> {
        if self.event_type != T::EVENT_TYPE {
            return None;
        }
        let data = serde_json::from_value(self.data.clone()).ok()?;
        Some(Event {
            event_type: self.event_type.clone(),
            data,
            time_fired: self.time_fired,
            context: self.context.clone(),
        })
    }
}

/// Who a published error is attributed to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCause {
    /// This service or a device it controls
    #[default]
    Internal,
    /// The caller's request
    External,
}

impl std::fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorCause::Internal => "internal",
            ErrorCause::External => "external",
        })
    }
}
