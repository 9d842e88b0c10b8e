//! Status pipeline errors

use av_core::{DirectoryError, EvaluatorKey};
use av_evaluator_registry::{EvaluatorError, RegistryError};
use thiserror::Error;

/// Errors that abort a status pipeline call
///
/// Unreachable devices are not errors here: they produce error-carrying
/// status responses and the rest of the room is still aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("status evaluator {evaluator} failed: {source}")]
    Evaluation {
        evaluator: EvaluatorKey,
        #[source]
        source: EvaluatorError,
    },

    #[error(transparent)]
    Lookup(#[from] RegistryError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("no status commands for room")]
    NoCommands,
}

impl StatusError {
    /// Whether a room or evaluator could not be found
    pub fn is_lookup(&self) -> bool {
        matches!(self, StatusError::Lookup(_) | StatusError::Directory(_))
    }
}

/// Result type for status pipeline calls
pub type StatusResult<T> = Result<T, StatusError>;
