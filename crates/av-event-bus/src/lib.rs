//! Event bus for the AV control API
//!
//! Device-level failures observed while polling status are published here
//! so operators can watch them without the status query failing. Each event
//! type gets its own tokio broadcast channel, created on first subscription;
//! a second channel carries every event. Publishing never blocks and events
//! nobody subscribed to are dropped.

use std::marker::PhantomData;
use std::sync::Arc;

use av_core::events::DeviceErrorData;
use av_core::{Context, ErrorCause, ErrorPublisher, Event, EventData};
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

const DEFAULT_CAPACITY: usize = 256;

pub struct EventBus {
    /// Per event type channels, keyed by `EventData::EVENT_TYPE`
    channels: DashMap<&'static str, broadcast::Sender<Event>>,
    everything: broadcast::Sender<Event>,
    capacity: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a bus whose channels buffer `capacity` events per subscriber
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            everything: broadcast::channel(capacity).0,
            capacity,
        }
    }

    /// Subscribe to one event type
    pub fn subscribe<T: EventData>(&self) -> Subscription<T> {
        trace!(event_type = T::EVENT_TYPE, "Subscribing");
        let rx = self
            .channels
            .entry(T::EVENT_TYPE)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();

        Subscription {
            rx,
            _payload: PhantomData,
        }
    }

    /// Subscribe to every event, untyped
    pub fn subscribe_all(&self) -> broadcast::Receiver<Event> {
        self.everything.subscribe()
    }

    /// Publish a typed event
    pub fn publish<T: EventData>(&self, data: T, context: Context) {
        let event = match Event::new(data, context).encode() {
            Ok(event) => event,
            Err(e) => {
                warn!(event_type = T::EVENT_TYPE, error = %e, "Dropping unserializable event");
                return;
            }
        };
        debug!(event_type = T::EVENT_TYPE, context = %event.context.id, "Publishing event");

        // Send only fails when nobody is listening
        if let Some(channel) = self.channels.get(T::EVENT_TYPE) {
            let _ = channel.send(event.clone());
        }
        let _ = self.everything.send(event);
    }

    /// Live subscribers across all channels
    pub fn subscriber_count(&self) -> usize {
        self.channels
            .iter()
            .map(|c| c.receiver_count())
            .sum::<usize>()
            + self.everything.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorPublisher for EventBus {
    fn publish_error(&self, message: &str, cause: ErrorCause) {
        self.publish(
            DeviceErrorData {
                message: message.to_string(),
                cause,
            },
            Context::new(),
        );
    }
}

/// Receives events of one type
pub struct Subscription<T> {
    rx: broadcast::Receiver<Event>,
    _payload: PhantomData<T>,
}

impl<T: EventData> Subscription<T> {
    /// Wait for the next event
    ///
    /// Events whose payload does not decode as `T` are skipped.
    pub async fn recv(&mut self) -> Result<Event<T>, broadcast::error::RecvError> {
        loop {
            let event = self.rx.recv().await?;
            match event.decode::<T>() {
                Some(typed) => return Ok(typed),
                None => warn!(event_type = T::EVENT_TYPE, "Skipping undecodable event"),
            }
        }
    }
}

pub type SharedEventBus = Arc<EventBus>;

#[cfg(test)]
mod tests {
    use super::*;
    use av_core::events::DEVICE_ERROR;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct RoomApplied {
        room: String,
    }

    impl EventData for RoomApplied {
        const EVENT_TYPE: &'static str = "room_applied";
    }

    #[tokio::test]
    async fn test_publish_error_reaches_typed_subscriber() {
        let bus = EventBus::new();
        let mut errors = bus.subscribe::<DeviceErrorData>();

        bus.publish_error(
            "Error querying status for destination: ITB-1110-D1: timeout",
            ErrorCause::Internal,
        );

        let event = errors.recv().await.unwrap();
        assert_eq!(event.event_type, DEVICE_ERROR);
        assert_eq!(
            event.data.message,
            "Error querying status for destination: ITB-1110-D1: timeout"
        );
        assert_eq!(event.data.cause, ErrorCause::Internal);
    }

    #[tokio::test]
    async fn test_subscribers_only_see_their_type() {
        let bus = EventBus::new();
        let mut errors = bus.subscribe::<DeviceErrorData>();
        let mut applied = bus.subscribe::<RoomApplied>();

        bus.publish(
            RoomApplied {
                room: "ITB-1110".to_string(),
            },
            Context::new(),
        );

        assert_eq!(applied.recv().await.unwrap().data.room, "ITB-1110");
        assert!(errors.rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_subscribe_all_sees_everything() {
        let bus = EventBus::new();
        let mut all = bus.subscribe_all();

        bus.publish_error("a", ErrorCause::External);
        bus.publish(
            RoomApplied {
                room: "ITB-1108".to_string(),
            },
            Context::new(),
        );

        assert_eq!(all.recv().await.unwrap().event_type, DEVICE_ERROR);
        assert_eq!(all.recv().await.unwrap().event_type, "room_applied");
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        bus.publish_error("nobody is listening", ErrorCause::Internal);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
