//! Controller configuration: loaded once at startup, immutable afterwards.

use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::EntityState;
use crate::error::ValidationError;
use crate::id::EntityId;

/// Tuning and wiring of the dimming controller.
///
/// Every field has a default, so an empty `[autolights]` table is valid
/// (it simply manages nothing). List-valued keys also accept a single string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Lights under automatic dimming.
    #[serde(deserialize_with = "one_or_many")]
    pub lights: Vec<EntityId>,
    /// Occupancy/motion entities that brighten the lights.
    #[serde(deserialize_with = "one_or_many")]
    pub triggers: Vec<EntityId>,
    /// Trigger states that count as "activated".
    #[serde(deserialize_with = "one_or_many")]
    pub trigger_states: Vec<EntityState>,

    /// Hold after a trigger before the lights are cut.
    pub trigger_minutes: u32,
    /// Whether triggers also fire while it is light outside.
    pub trigger_during_day: bool,
    /// Minimum level a trigger brightens to.
    pub trigger_level: f64,
    pub trigger_transition_seconds: u32,

    /// Hold after a manual switch-on before the first decay step.
    pub initial_minutes: u32,
    /// Interval between decay steps of a manual light.
    pub update_minutes: u32,
    /// Amount subtracted from the level on every decay step.
    pub dim_increment: f64,
    /// Decay never goes below this level.
    pub min_dim_level: f64,
    /// Levels at or below this turn the light off.
    pub threshold_level: f64,
    pub dim_transition_seconds: u32,

    /// Binary sensor reporting `on` while it is dark outside.
    pub dark_outside_entity: EntityId,

    /// Verbose controller logging.
    pub debug: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            lights: Vec::new(),
            triggers: Vec::new(),
            trigger_states: vec![EntityState::On],
            trigger_minutes: 10,
            trigger_during_day: false,
            trigger_level: 1.0,
            trigger_transition_seconds: 0,
            initial_minutes: 30,
            update_minutes: 15,
            dim_increment: 0.2,
            min_dim_level: 0.0,
            threshold_level: 0.1,
            dim_transition_seconds: 30,
            dark_outside_entity: EntityId::new_unchecked("binary_sensor.dark_outside"),
            debug: false,
        }
    }
}

impl ControllerConfig {
    /// Check that every normalized level lies within `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LevelOutOfRange`] naming the first
    /// offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let levels = [
            ("trigger_level", self.trigger_level),
            ("dim_increment", self.dim_increment),
            ("min_dim_level", self.min_dim_level),
            ("threshold_level", self.threshold_level),
        ];
        for (field, value) in levels {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::LevelOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}
