//! Correlation context carried by events

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Correlates an event with the request that caused it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// ULID, sortable by creation time
    pub id: String,

    /// Context of the request this one was spawned from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            id: Ulid::new().to_string(),
            parent_id: None,
        }
    }

    /// A fresh context recording `self` as its parent
    pub fn child(&self) -> Self {
        Self {
            parent_id: Some(self.id.clone()),
            ..Self::new()
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
