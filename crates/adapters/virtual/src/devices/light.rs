//! Virtual light, dimmable or on/off.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use autolights_domain::brightness::{MAX_RAW_BRIGHTNESS, read_level, to_raw};
use autolights_domain::entity::{AttributeValue, BRIGHTNESS_ATTRIBUTE, Entity, EntityState};
use autolights_domain::event::StateChange;
use autolights_domain::id::EntityId;
use autolights_domain::time::Timestamp;

struct LightState {
    on: bool,
    brightness: u8,
    last_changed: Timestamp,
}

/// A simulated light.
///
/// A dimmable light reports its raw brightness while on; an on/off light
/// reports no brightness at all and treats any non-zero command as "on".
pub struct VirtualLight {
    entity_id: EntityId,
    dimmable: bool,
    state: Mutex<LightState>,
}

impl VirtualLight {
    #[must_use]
    pub fn new(
        entity_id: EntityId,
        dimmable: bool,
        on: bool,
        brightness: Option<u8>,
        at: Timestamp,
    ) -> Self {
        Self {
            entity_id,
            dimmable,
            state: Mutex::new(LightState {
                on,
                brightness: brightness
                    .filter(|raw| *raw > 0)
                    .unwrap_or(MAX_RAW_BRIGHTNESS),
                last_changed: at,
            }),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Entity {
        let state = self.lock();
        let mut attributes = HashMap::new();
        if self.dimmable && state.on {
            attributes.insert(
                BRIGHTNESS_ATTRIBUTE.to_string(),
                AttributeValue::Int(i64::from(state.brightness)),
            );
        }
        Entity {
            entity_id: self.entity_id.clone(),
            state: on_off(state.on),
            attributes,
            last_changed: state.last_changed,
        }
    }

    /// Apply a brightness command; `0` turns the light off.
    pub fn set_brightness(&self, raw: u8, at: Timestamp) -> Option<StateChange> {
        self.update(raw > 0, raw, at)
    }

    pub fn turn_off(&self, at: Timestamp) -> Option<StateChange> {
        self.update(false, 0, at)
    }

    /// Apply an externally reported snapshot (a wall switch, a dimmer).
    pub fn apply(&self, entity: &Entity, at: Timestamp) -> Option<StateChange> {
        let raw = to_raw(read_level(Some(entity)));
        self.update(raw > 0, raw, at)
    }

    fn update(&self, on: bool, raw: u8, at: Timestamp) -> Option<StateChange> {
        let mut state = self.lock();
        let was_on = state.on;
        let brightness_changed = self.dimmable && on && state.brightness != raw;

        state.on = on;
        if on {
            state.brightness = raw;
        }

        let attribute = if was_on != on {
            state.last_changed = at;
            None
        } else if was_on && brightness_changed {
            Some(BRIGHTNESS_ATTRIBUTE.to_string())
        } else {
            return None;
        };

        Some(StateChange {
            entity_id: self.entity_id.clone(),
            attribute,
            from: Some(on_off(was_on)),
            to: on_off(on),
            at,
        })
    }

    fn lock(&self) -> MutexGuard<'_, LightState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn on_off(on: bool) -> EntityState {
    if on { EntityState::On } else { EntityState::Off }
}
