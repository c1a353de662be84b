//! Simulated devices: dimmable or on/off lights, and sensors.
//!
//! Every mutation returns the [`StateChange`] it caused, or `None` when the
//! device already was in the requested state.

mod light;
mod sensor;

pub use light::VirtualLight;
pub use sensor::VirtualSensor;

use autolights_domain::entity::Entity;
use autolights_domain::event::StateChange;
use autolights_domain::time::Timestamp;

use crate::config::VirtualEntityConfig;

pub enum VirtualDevice {
    Light(VirtualLight),
    Sensor(VirtualSensor),
}

impl VirtualDevice {
    /// Build the device described by `config`, its kind taken from the id domain.
    #[must_use]
    pub fn from_config(config: &VirtualEntityConfig, at: Timestamp) -> Self {
        if config.entity_id.domain() == "light" {
            Self::Light(VirtualLight::new(
                config.entity_id.clone(),
                config.dimmable,
                config.state.is_on(),
                config.brightness,
                at,
            ))
        } else {
            Self::Sensor(VirtualSensor::new(
                config.entity_id.clone(),
                config.state.clone(),
                at,
            ))
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Entity {
        match self {
            Self::Light(light) => light.snapshot(),
            Self::Sensor(sensor) => sensor.snapshot(),
        }
    }

    /// Overwrite the device with an externally reported snapshot.
    pub fn apply(&self, entity: &Entity, at: Timestamp) -> Option<StateChange> {
        match self {
            Self::Light(light) => light.apply(entity, at),
            Self::Sensor(sensor) => sensor.apply(&entity.state, at),
        }
    }
}
