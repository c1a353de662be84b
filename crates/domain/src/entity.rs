//! Entity: a snapshot of one host entity as reported by the host.
//!
//! The controller never owns entities; it reads snapshots through the
//! `StateReader` port and issues commands that change them on the host.

mod attribute_value;
mod state;

pub use attribute_value::AttributeValue;
pub use state::EntityState;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AutolightsError, ValidationError};
use crate::id::EntityId;
use crate::time::{Timestamp, now};

/// Attribute carrying the raw 0–255 brightness of a dimmable light.
pub const BRIGHTNESS_ATTRIBUTE: &str = "brightness";

/// Reported state and attributes of a single host entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_id: EntityId,
    pub state: EntityState,
    #[serde(default)]
    pub attributes: HashMap<String, AttributeValue>,
    pub last_changed: Timestamp,
}

impl Entity {
    /// Create a builder for constructing an [`Entity`].
    #[must_use]
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    /// Look up an attribute by key.
    #[must_use]
    pub fn get_attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Insert or replace an attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.attributes.insert(key.into(), value);
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, key: &str) -> Option<AttributeValue> {
        self.attributes.remove(key)
    }

    /// Raw brightness, when the entity reports a numeric one.
    #[must_use]
    pub fn brightness(&self) -> Option<f64> {
        self.get_attribute(BRIGHTNESS_ATTRIBUTE)
            .and_then(AttributeValue::as_f64)
    }

    /// Whether the entity is reported as `on`.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state.is_on()
    }

    /// Replace the state, bumping `last_changed` only when it differs.
    pub fn update_state(&mut self, new_state: EntityState, ts: Timestamp) {
        if self.state != new_state {
            self.state = new_state;
            self.last_changed = ts;
        }
    }
}

/// Step-by-step builder for [`Entity`].
#[derive(Debug, Default)]
pub struct EntityBuilder {
    entity_id: Option<EntityId>,
    state: Option<EntityState>,
    attributes: HashMap<String, AttributeValue>,
    last_changed: Option<Timestamp>,
}

impl EntityBuilder {
    #[must_use]
    pub fn entity_id(mut self, entity_id: EntityId) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    #[must_use]
    pub fn state(mut self, state: EntityState) -> Self {
        self.state = Some(state);
        self
    }

    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn last_changed(mut self, ts: Timestamp) -> Self {
        self.last_changed = Some(ts);
        self
    }

    /// Consume the builder and return an [`Entity`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyEntityId`] if no entity id was set.
    pub fn build(self) -> Result<Entity, AutolightsError> {
        let entity_id = self.entity_id.ok_or(ValidationError::EmptyEntityId)?;
        Ok(Entity {
            entity_id,
            state: self.state.unwrap_or_default(),
            attributes: self.attributes,
            last_changed: self.last_changed.unwrap_or_else(now),
        })
    }
}
