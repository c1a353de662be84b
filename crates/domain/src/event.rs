//! Controller events: the only inputs that drive the controller.
//!
//! Host state-change notifications and periodic ticks are both expressed as
//! [`ControllerEvent`]s and delivered, in order, through a single handling
//! entry point.

use serde::{Deserialize, Serialize};

use crate::entity::EntityState;
use crate::id::EntityId;
use crate::time::Timestamp;

/// A reported change of one entity's state or one of its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub entity_id: EntityId,
    /// Name of the changed attribute, or `None` for the primary state.
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub from: Option<EntityState>,
    pub to: EntityState,
    pub at: Timestamp,
}

impl StateChange {
    /// Whether the change concerns the primary state rather than an attribute.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        self.attribute.is_none()
    }
}

/// Input delivered to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerEvent {
    /// The host reported a change for an entity.
    StateChanged(StateChange),
    /// The fixed-period reconciliation pass is due.
    Tick { at: Timestamp },
}

impl ControllerEvent {
    /// When the event happened.
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::StateChanged(change) => change.at,
            Self::Tick { at } => *at,
        }
    }
}

impl std::fmt::Display for ControllerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StateChanged(change) => match &change.attribute {
                Some(attr) => write!(f, "state_changed({}.{attr})", change.entity_id),
                None => write!(f, "state_changed({} -> {})", change.entity_id, change.to),
            },
            Self::Tick { .. } => f.write_str("tick"),
        }
    }
}
