//! # autolights-adapter-virtual
//!
//! In-memory host that simulates lights and sensors.
//!
//! ## Behaviour
//!
//! | Entity kind | Id domain | Reacts to |
//! |-------------|-----------|-----------|
//! | Dimmable light | `light.*` | `set_brightness`, `turn_off`, external snapshots |
//! | On/off light | `light.*` (`dimmable = false`) | same, brightness is ignored |
//! | Sensor | anything else | external snapshots only |
//!
//! Every change, whether commanded by the controller or reported from
//! outside, is published as a `StateChanged` event, so the controller sees
//! the echoes of its own commands exactly like it would on a real host.
//! Transitions are applied instantly.
//!
//! ## Dependency rule
//!
//! Depends on `autolights-app` (port traits) and `autolights-domain` only.

pub mod config;
mod devices;

use std::collections::HashMap;

use autolights_app::ports::{EventPublisher, LightCommander, StateReader, StateWriter};
use autolights_domain::entity::Entity;
use autolights_domain::error::{AutolightsError, NotFoundError};
use autolights_domain::event::{ControllerEvent, StateChange};
use autolights_domain::id::EntityId;
use autolights_domain::time::now;

use config::VirtualHostConfig;
use devices::{VirtualDevice, VirtualLight};

/// Simulated host publishing its state changes to `P`.
pub struct VirtualHost<P> {
    devices: HashMap<EntityId, VirtualDevice>,
    publisher: P,
}

impl<P> VirtualHost<P>
where
    P: EventPublisher + Send + Sync,
{
    #[must_use]
    pub fn new(config: &VirtualHostConfig, publisher: P) -> Self {
        let at = now();
        let devices = config
            .entities
            .iter()
            .map(|entity| {
                (
                    entity.entity_id.clone(),
                    VirtualDevice::from_config(entity, at),
                )
            })
            .collect();
        Self { devices, publisher }
    }

    /// Ids of every simulated entity, sorted.
    #[must_use]
    pub fn entity_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.devices.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn device(&self, entity_id: &EntityId) -> Result<&VirtualDevice, NotFoundError> {
        self.devices.get(entity_id).ok_or_else(|| NotFoundError {
            entity: "entity",
            id: entity_id.to_string(),
        })
    }

    fn light(&self, entity_id: &EntityId) -> Result<&VirtualLight, NotFoundError> {
        match self.devices.get(entity_id) {
            Some(VirtualDevice::Light(light)) => Ok(light),
            _ => Err(NotFoundError {
                entity: "light",
                id: entity_id.to_string(),
            }),
        }
    }

    async fn emit(&self, change: Option<StateChange>) {
        let Some(change) = change else {
            return;
        };
        tracing::debug!(entity_id = %change.entity_id, to = %change.to, "virtual state changed");
        if let Err(err) = self
            .publisher
            .publish(ControllerEvent::StateChanged(change))
            .await
        {
            tracing::warn!(%err, "failed to publish state change");
        }
    }
}

impl<P> StateReader for VirtualHost<P>
where
    P: EventPublisher + Send + Sync,
{
    async fn get_entity(&self, entity_id: &EntityId) -> Result<Option<Entity>, AutolightsError> {
        Ok(self.devices.get(entity_id).map(VirtualDevice::snapshot))
    }

    async fn entity_exists(&self, entity_id: &EntityId) -> Result<bool, AutolightsError> {
        Ok(self.devices.contains_key(entity_id))
    }
}

impl<P> LightCommander for VirtualHost<P>
where
    P: EventPublisher + Send + Sync,
{
    async fn set_brightness(
        &self,
        entity_id: &EntityId,
        brightness: u8,
        transition_secs: u32,
    ) -> Result<(), AutolightsError> {
        let light = self.light(entity_id)?;
        tracing::debug!(%entity_id, brightness, transition_secs, "virtual set_brightness");
        self.emit(light.set_brightness(brightness, now())).await;
        Ok(())
    }

    async fn turn_off(
        &self,
        entity_id: &EntityId,
        transition_secs: u32,
    ) -> Result<(), AutolightsError> {
        let light = self.light(entity_id)?;
        tracing::debug!(%entity_id, transition_secs, "virtual turn_off");
        self.emit(light.turn_off(now())).await;
        Ok(())
    }
}

impl<P> StateWriter for VirtualHost<P>
where
    P: EventPublisher + Send + Sync,
{
    async fn set_entity(&self, entity: Entity) -> Result<Entity, AutolightsError> {
        let device = self.device(&entity.entity_id)?;
        self.emit(device.apply(&entity, now())).await;
        Ok(device.snapshot())
    }
}
