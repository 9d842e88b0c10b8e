//! Command dispatch errors

use av_core::{DirectoryError, EvaluatorKey};
use av_evaluator_registry::{EvaluatorError, RegistryError};
use thiserror::Error;

/// Errors that abort a command dispatch call
///
/// Transport failures are not here: they are recorded per action in the
/// execution reports and execution continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("evaluator {evaluator} failed: {source}")]
    Evaluation {
        evaluator: EvaluatorKey,
        #[source]
        source: EvaluatorError,
    },

    #[error("there was an error retrieving the command {action} for device {device}")]
    CommandNotFound { action: String, device: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("not enough parameter locations in endpoint for command {action} on device {device}: expected {expected}, found {available}")]
    ParameterCount {
        action: String,
        device: String,
        expected: usize,
        available: usize,
    },

    #[error("{incompatible} is an incompatible action with {action} for device with ID {device_id}")]
    Conflict {
        action: String,
        incompatible: String,
        device_id: i64,
    },
}

impl CommandError {
    pub(crate) fn from_evaluator(evaluator: EvaluatorKey, error: EvaluatorError) -> Self {
        match error {
            EvaluatorError::Directory(e) => CommandError::Directory(e),
            source => CommandError::Evaluation { evaluator, source },
        }
    }

    /// Whether a named command, device or evaluator could not be found
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            CommandError::CommandNotFound { .. }
                | CommandError::Registry(RegistryError::NotFound(_))
                | CommandError::Directory(_)
        )
    }
}

/// Result type for command dispatch
pub type CommandResult<T> = Result<T, CommandError>;
