//! Core types for the AV control API
//!
//! This crate provides the data model shared by the command dispatch and
//! status pipelines: devices and rooms as read from configuration, actions
//! and their execution reports, status commands and responses, and the
//! canonical public room representation. It also defines the narrow traits
//! the pipelines use to reach their external collaborators.

mod action;
mod collaborators;
mod context;
mod device;
mod endpoint;
mod evaluator_key;
mod event;
mod room_state;
mod status;

pub use action::{Action, ExecutionReport};
pub use collaborators::{
    DeviceDirectory, DeviceTransport, DirectoryError, ErrorPublisher, TransportError,
};
pub use context::Context;
pub use device::{Command, Device, Port, Room, RoomConfiguration};
pub use endpoint::{build_endpoint, EndpointError, ADDRESS_TOKEN};
pub use evaluator_key::{EvaluatorKey, UnknownEvaluatorKey, STATUS_FLAG};
pub use event::{ErrorCause, Event, EventData};
pub use room_state::{AudioDevice, Display, PublicRoom};
pub use status::{Status, StatusCommand, StatusMap, StatusResponse};

/// Events fired by the pipelines
pub mod events {
    use super::{ErrorCause, EventData};
    use serde::{Deserialize, Serialize};

    /// A device could not be queried
    pub const DEVICE_ERROR: &str = "device_error";

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DeviceErrorData {
        pub message: String,
        pub cause: ErrorCause,
    }

    impl EventData for DeviceErrorData {
        const EVENT_TYPE: &'static str = DEVICE_ERROR;
    }
}
