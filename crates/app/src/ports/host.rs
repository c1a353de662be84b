//! Host ports: reading entity state and commanding lights.
//!
//! These cover the host collaborator's capability set. Subscriptions are not
//! part of it: hosts push [`ControllerEvent`](autolights_domain::event::ControllerEvent)s
//! through an [`EventPublisher`](super::EventPublisher) instead.

use std::future::Future;
use std::sync::Arc;

use autolights_domain::entity::Entity;
use autolights_domain::error::AutolightsError;
use autolights_domain::id::EntityId;

/// Read access to the host's entity states.
pub trait StateReader {
    /// Current snapshot of an entity, or `None` if the host has no value.
    fn get_entity(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<Entity>, AutolightsError>> + Send;

    /// Whether the host knows the entity at all.
    fn entity_exists(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<bool, AutolightsError>> + Send;
}

/// One-way light commands.
///
/// Implementations must not wait for the device to acknowledge; the
/// returned future completes once the command has been handed to the host.
pub trait LightCommander {
    /// Set a light to a raw `0..=255` brightness over `transition_secs`.
    fn set_brightness(
        &self,
        entity_id: &EntityId,
        brightness: u8,
        transition_secs: u32,
    ) -> impl Future<Output = Result<(), AutolightsError>> + Send;

    /// Turn a light off over `transition_secs`.
    fn turn_off(
        &self,
        entity_id: &EntityId,
        transition_secs: u32,
    ) -> impl Future<Output = Result<(), AutolightsError>> + Send;
}

/// Reports an externally caused state change to the host.
///
/// Used by operator surfaces (and tests) to simulate a wall switch, a motion
/// sensor or any other actor the controller does not command.
pub trait StateWriter {
    /// Replace the entity's state and attributes, returning the stored snapshot.
    fn set_entity(
        &self,
        entity: Entity,
    ) -> impl Future<Output = Result<Entity, AutolightsError>> + Send;
}

impl<T: StateReader + Send + Sync> StateReader for Arc<T> {
    fn get_entity(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<Entity>, AutolightsError>> + Send {
        (**self).get_entity(entity_id)
    }

    fn entity_exists(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<bool, AutolightsError>> + Send {
        (**self).entity_exists(entity_id)
    }
}

impl<T: LightCommander + Send + Sync> LightCommander for Arc<T> {
    fn set_brightness(
        &self,
        entity_id: &EntityId,
        brightness: u8,
        transition_secs: u32,
    ) -> impl Future<Output = Result<(), AutolightsError>> + Send {
        (**self).set_brightness(entity_id, brightness, transition_secs)
    }

    fn turn_off(
        &self,
        entity_id: &EntityId,
        transition_secs: u32,
    ) -> impl Future<Output = Result<(), AutolightsError>> + Send {
        (**self).turn_off(entity_id, transition_secs)
    }
}

impl<T: StateWriter + Send + Sync> StateWriter for Arc<T> {
    fn set_entity(
        &self,
        entity: Entity,
    ) -> impl Future<Output = Result<Entity, AutolightsError>> + Send {
        (**self).set_entity(entity)
    }
}
