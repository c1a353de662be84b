//! Simulated entity configuration (`[virtual_host]`).

use serde::{Deserialize, Serialize};

use autolights_domain::entity::EntityState;
use autolights_domain::id::EntityId;

/// Entities the virtual host simulates.
///
/// Ids in the `light` domain become lights; everything else is a sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualHostConfig {
    pub entities: Vec<VirtualEntityConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualEntityConfig {
    pub entity_id: EntityId,
    /// Lights only: whether the light reports a `brightness` attribute.
    #[serde(default = "default_dimmable")]
    pub dimmable: bool,
    #[serde(default = "default_state")]
    pub state: EntityState,
    /// Lights only: raw brightness while on. Defaults to full.
    #[serde(default)]
    pub brightness: Option<u8>,
}

fn default_dimmable() -> bool {
    true
}

fn default_state() -> EntityState {
    EntityState::Off
}

impl VirtualEntityConfig {
    #[must_use]
    pub fn new(entity_id: EntityId, state: EntityState) -> Self {
        Self {
            entity_id,
            dimmable: default_dimmable(),
            state,
            brightness: None,
        }
    }

    #[must_use]
    pub fn dimmable(mut self, dimmable: bool) -> Self {
        self.dimmable = dimmable;
        self
    }

    #[must_use]
    pub fn brightness(mut self, brightness: u8) -> Self {
        self.brightness = Some(brightness);
        self
    }
}

impl Default for VirtualHostConfig {
    fn default() -> Self {
        let id = |raw: &str| EntityId::new(raw).ok();
        let entities = [
            id("light.living_room").map(|id| VirtualEntityConfig::new(id, EntityState::Off)),
            id("light.porch")
                .map(|id| VirtualEntityConfig::new(id, EntityState::Off).dimmable(false)),
            id("binary_sensor.hallway_motion")
                .map(|id| VirtualEntityConfig::new(id, EntityState::Off)),
            id("binary_sensor.dark_outside")
                .map(|id| VirtualEntityConfig::new(id, EntityState::On)),
        ];
        Self {
            entities: entities.into_iter().flatten().collect(),
        }
    }
}
