//! Entity tracking table: scheduling state of every light under automatic control.
//!
//! A light is in the table exactly while it is lit because of this
//! controller. Rows are created by a manual observation, a trigger or a
//! brightness command, and removed when the light reaches zero.

use std::collections::HashMap;

use serde::Serialize;

use crate::id::EntityId;
use crate::time::{Timestamp, minutes};

/// Scheduling record of one managed light.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedEntity {
    pub entity_id: EntityId,
    /// Deadline after which the next decay step (or trigger expiry) fires.
    pub next_update_time: Option<Timestamp>,
    /// Set once a person switched the light on; never cleared afterwards.
    pub manual: bool,
    /// When this controller last issued a brightness command for the light.
    pub last_update_time: Option<Timestamp>,
}

impl TrackedEntity {
    fn new(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            next_update_time: None,
            manual: false,
            last_update_time: None,
        }
    }

    /// Whether the deadline has strictly passed at `now`.
    #[must_use]
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.next_update_time.is_some_and(|deadline| now > deadline)
    }
}

/// Id-keyed table of [`TrackedEntity`] rows.
#[derive(Debug, Default, Clone)]
pub struct TrackingTable {
    rows: HashMap<EntityId, TrackedEntity>,
}

impl TrackingTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, entity_id: &EntityId) -> Option<&TrackedEntity> {
        self.rows.get(entity_id)
    }

    #[must_use]
    pub fn contains(&self, entity_id: &EntityId) -> bool {
        self.rows.contains_key(entity_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Insert or extend the row's deadline to `now + offset_minutes`.
    ///
    /// An existing later deadline is kept. `manual = true` marks the row
    /// manual for good; `manual = false` leaves the flag untouched.
    pub fn schedule_update(
        &mut self,
        entity_id: &EntityId,
        now: Timestamp,
        offset_minutes: u32,
        manual: bool,
    ) -> &TrackedEntity {
        let candidate = now + minutes(offset_minutes);
        let row = self
            .rows
            .entry(entity_id.clone())
            .or_insert_with(|| TrackedEntity::new(entity_id.clone()));
        row.next_update_time = Some(match row.next_update_time {
            Some(existing) => existing.max(candidate),
            None => candidate,
        });
        if manual {
            row.manual = true;
        }
        row
    }

    /// Record that a command was just issued for the entity.
    pub fn stamp_command(&mut self, entity_id: &EntityId, now: Timestamp) {
        self.rows
            .entry(entity_id.clone())
            .or_insert_with(|| TrackedEntity::new(entity_id.clone()))
            .last_update_time = Some(now);
    }

    /// Remove the row, returning it if it existed.
    pub fn untrack(&mut self, entity_id: &EntityId) -> Option<TrackedEntity> {
        self.rows.remove(entity_id)
    }

    /// Ids of the rows whose deadline has passed, sorted.
    #[must_use]
    pub fn due(&self, now: Timestamp) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .rows
            .values()
            .filter(|row| row.is_due(now))
            .map(|row| row.entity_id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// All rows, sorted by entity id.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TrackedEntity> {
        let mut rows: Vec<TrackedEntity> = self.rows.values().cloned().collect();
        rows.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
        rows
    }
}
