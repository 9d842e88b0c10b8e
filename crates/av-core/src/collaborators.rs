//! Traits for the pipelines' external collaborators
//!
//! The pipelines never talk to the network, the configuration store or the
//! event router directly; they go through these traits so the transport and
//! directory can be swapped (and faked in tests).

use async_trait::async_trait;
use thiserror::Error;

use crate::{Device, ErrorCause, Room};

/// Errors raised by a device transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
}

/// Issues unauthenticated GET requests to device control endpoints
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// GET the URL and return the response body
    ///
    /// A non-2xx response is an error.
    async fn get(&self, url: &str) -> Result<String, TransportError>;
}

/// Errors raised by a room/device directory
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("room not found: {building}-{room}")]
    RoomNotFound { building: String, room: String },

    #[error("device not found: {building}-{room}-{name}")]
    DeviceNotFound {
        building: String,
        room: String,
        name: String,
    },

    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Looks up rooms and devices in the configuration store
#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    async fn get_room(&self, building: &str, room: &str) -> Result<Room, DirectoryError>;

    async fn get_device_by_name(
        &self,
        room: &str,
        building: &str,
        name: &str,
    ) -> Result<Device, DirectoryError>;
}

/// Publishes errors to operators
///
/// Fire-and-forget: implementations must not block and callers never
/// observe a failure.
pub trait ErrorPublisher: Send + Sync {
    fn publish_error(&self, message: &str, cause: ErrorCause);
}
