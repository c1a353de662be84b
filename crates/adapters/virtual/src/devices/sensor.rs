//! Virtual binary sensor (motion, dark-outside, door contact, ...).

use std::sync::{Mutex, MutexGuard, PoisonError};

use autolights_domain::entity::{Entity, EntityState};
use autolights_domain::event::StateChange;
use autolights_domain::id::EntityId;
use autolights_domain::time::Timestamp;

/// A simulated sensor holding a single state value.
///
/// Sensors accept no commands; their state only changes through
/// externally reported snapshots.
pub struct VirtualSensor {
    entity_id: EntityId,
    state: Mutex<(EntityState, Timestamp)>,
}

impl VirtualSensor {
    #[must_use]
    pub fn new(entity_id: EntityId, state: EntityState, at: Timestamp) -> Self {
        Self {
            entity_id,
            state: Mutex::new((state, at)),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Entity {
        let guard = self.lock();
        Entity {
            entity_id: self.entity_id.clone(),
            state: guard.0.clone(),
            attributes: std::collections::HashMap::new(),
            last_changed: guard.1,
        }
    }

    pub fn apply(&self, new_state: &EntityState, at: Timestamp) -> Option<StateChange> {
        let mut guard = self.lock();
        if guard.0 == *new_state {
            return None;
        }
        let from = std::mem::replace(&mut guard.0, new_state.clone());
        guard.1 = at;
        Some(StateChange {
            entity_id: self.entity_id.clone(),
            attribute: None,
            from: Some(from),
            to: new_state.clone(),
            at,
        })
    }

    fn lock(&self) -> MutexGuard<'_, (EntityState, Timestamp)> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
