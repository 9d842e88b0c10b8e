//! Evaluator registry for the AV control API
//!
//! Maps every [`EvaluatorKey`] to the command or status evaluator that
//! implements it. The registry is assembled once at startup through a
//! [`RegistryBuilder`], which refuses duplicate or misfiled registrations,
//! and is read-only afterwards so it can be shared across tasks freely.

mod evaluator;

pub use av_core::EvaluatorKey;
pub use evaluator::{
    CommandEvaluator, EvaluationContext, EvaluatorError, EvaluatorResult, StatusEvaluator,
};

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors that can occur when working with the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("evaluator already registered: {0}")]
    AlreadyRegistered(EvaluatorKey),

    #[error("evaluator not found: {0}")]
    NotFound(String),

    #[error("{key} is not a {expected} evaluator")]
    WrongFamily {
        key: EvaluatorKey,
        expected: &'static str,
    },
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// A registered evaluator, tagged by family
#[derive(Clone)]
enum Evaluator {
    Command(Arc<dyn CommandEvaluator>),
    Status(Arc<dyn StatusEvaluator>),
}

/// Collects evaluators before the registry is frozen
#[derive(Default)]
pub struct RegistryBuilder {
    evaluators: HashMap<EvaluatorKey, Evaluator>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command evaluator
    ///
    /// Fails if the key is already taken or is a status key.
    #[instrument(skip(self, evaluator))]
    pub fn register_command(
        &mut self,
        key: EvaluatorKey,
        evaluator: impl CommandEvaluator + 'static,
    ) -> RegistryResult<&mut Self> {
        if key.is_status() {
            return Err(RegistryError::WrongFamily {
                key,
                expected: "command",
            });
        }
        self.insert(key, Evaluator::Command(Arc::new(evaluator)))
    }

    /// Register a status evaluator
    ///
    /// Fails if the key is already taken or is not a status key.
    #[instrument(skip(self, evaluator))]
    pub fn register_status(
        &mut self,
        key: EvaluatorKey,
        evaluator: impl StatusEvaluator + 'static,
    ) -> RegistryResult<&mut Self> {
        if !key.is_status() {
            return Err(RegistryError::WrongFamily {
                key,
                expected: "status",
            });
        }
        self.insert(key, Evaluator::Status(Arc::new(evaluator)))
    }

    fn insert(&mut self, key: EvaluatorKey, evaluator: Evaluator) -> RegistryResult<&mut Self> {
        if self.evaluators.contains_key(&key) {
            warn!(%key, "Refusing duplicate evaluator registration");
            return Err(RegistryError::AlreadyRegistered(key));
        }
        debug!(%key, "Registering evaluator");
        self.evaluators.insert(key, evaluator);
        Ok(self)
    }

    /// Freeze the registry
    pub fn build(self) -> Registry {
        Registry {
            evaluators: self.evaluators,
        }
    }
}

/// Read-only mapping from evaluator key to evaluator
pub struct Registry {
    evaluators: HashMap<EvaluatorKey, Evaluator>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Look up a command evaluator
    pub fn command(&self, key: EvaluatorKey) -> RegistryResult<&Arc<dyn CommandEvaluator>> {
        match self.evaluators.get(&key) {
            Some(Evaluator::Command(evaluator)) => Ok(evaluator),
            Some(Evaluator::Status(_)) => Err(RegistryError::WrongFamily {
                key,
                expected: "command",
            }),
            None => Err(RegistryError::NotFound(key.to_string())),
        }
    }

    /// Look up a command evaluator by action name (case-insensitive)
    pub fn command_for_action(&self, action: &str) -> RegistryResult<&Arc<dyn CommandEvaluator>> {
        let key: EvaluatorKey = action
            .parse()
            .map_err(|_| RegistryError::NotFound(action.to_string()))?;
        self.command(key)
    }

    /// Look up a status evaluator
    pub fn status(&self, key: EvaluatorKey) -> RegistryResult<&Arc<dyn StatusEvaluator>> {
        match self.evaluators.get(&key) {
            Some(Evaluator::Status(evaluator)) => Ok(evaluator),
            Some(Evaluator::Command(_)) => Err(RegistryError::WrongFamily {
                key,
                expected: "status",
            }),
            None => Err(RegistryError::NotFound(key.to_string())),
        }
    }

    pub fn contains(&self, key: EvaluatorKey) -> bool {
        self.evaluators.contains_key(&key)
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<EvaluatorKey> {
        let mut keys: Vec<_> = self.evaluators.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }
}

/// Thread-safe wrapper for Registry
pub type SharedRegistry = Arc<Registry>;
