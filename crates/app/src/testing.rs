//! In-memory host used by the controller tests.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use autolights_domain::brightness::read_level;
use autolights_domain::entity::{AttributeValue, BRIGHTNESS_ATTRIBUTE, Entity, EntityState};
use autolights_domain::error::AutolightsError;
use autolights_domain::id::EntityId;

use crate::ports::{LightCommander, StateReader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    SetBrightness {
        entity_id: EntityId,
        brightness: u8,
        transition_secs: u32,
    },
    TurnOff {
        entity_id: EntityId,
        transition_secs: u32,
    },
}

impl Command {
    pub(crate) fn entity_id(&self) -> &EntityId {
        match self {
            Self::SetBrightness { entity_id, .. } | Self::TurnOff { entity_id, .. } => entity_id,
        }
    }
}

/// Host that applies commands to its own snapshots, like a real device would.
#[derive(Default)]
pub(crate) struct FakeHost {
    entities: Mutex<HashMap<EntityId, Entity>>,
    dimmable: Mutex<HashSet<EntityId>>,
    commands: Mutex<Vec<Command>>,
    fail_reads: AtomicBool,
    fail_commands: AtomicBool,
}

pub(crate) fn id(raw: &str) -> EntityId {
    EntityId::new(raw).unwrap()
}

impl FakeHost {
    /// Register a dimmable light at the given raw brightness (`0` means off).
    pub(crate) fn with_dimmable(self, raw_id: &str, raw: u8) -> Self {
        self.dimmable.lock().unwrap().insert(id(raw_id));
        self.set_raw(raw_id, raw);
        self
    }

    /// Register an on/off light.
    pub(crate) fn with_switch(self, raw_id: &str, on: bool) -> Self {
        self.set_on(raw_id, on);
        self
    }

    /// Register a sensor in the given state.
    pub(crate) fn with_sensor(self, raw_id: &str, state: &str) -> Self {
        self.set_state(raw_id, state);
        self
    }

    pub(crate) fn set_raw(&self, raw_id: &str, raw: u8) {
        let mut builder = Entity::builder().entity_id(id(raw_id)).state(if raw > 0 {
            EntityState::On
        } else {
            EntityState::Off
        });
        if raw > 0 {
            builder = builder.attribute(BRIGHTNESS_ATTRIBUTE, AttributeValue::Int(i64::from(raw)));
        }
        self.insert(builder.build().unwrap());
    }

    pub(crate) fn set_on(&self, raw_id: &str, on: bool) {
        self.set_state(raw_id, if on { "on" } else { "off" });
    }

    pub(crate) fn set_state(&self, raw_id: &str, state: &str) {
        let entity = Entity::builder()
            .entity_id(id(raw_id))
            .state(EntityState::from(state))
            .build()
            .unwrap();
        self.insert(entity);
    }

    pub(crate) fn remove(&self, raw_id: &str) {
        self.entities.lock().unwrap().remove(&id(raw_id));
    }

    fn insert(&self, entity: Entity) {
        self.entities
            .lock()
            .unwrap()
            .insert(entity.entity_id.clone(), entity);
    }

    pub(crate) fn level(&self, raw_id: &str) -> f64 {
        read_level(self.entities.lock().unwrap().get(&id(raw_id)))
    }

    pub(crate) fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    pub(crate) fn clear_commands(&self) {
        self.commands.lock().unwrap().clear();
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_commands(&self, fail: bool) {
        self.fail_commands.store(fail, Ordering::SeqCst);
    }

    fn record(&self, command: Command) -> Result<(), AutolightsError> {
        self.commands.lock().unwrap().push(command);
        if self.fail_commands.load(Ordering::SeqCst) {
            return Err(AutolightsError::Host("host unreachable".into()));
        }
        Ok(())
    }
}

impl StateReader for FakeHost {
    fn get_entity(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<Entity>, AutolightsError>> + Send {
        let result = if self.fail_reads.load(Ordering::SeqCst) {
            Err(AutolightsError::Host("host unreachable".into()))
        } else {
            Ok(self.entities.lock().unwrap().get(entity_id).cloned())
        };
        async move { result }
    }

    fn entity_exists(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<bool, AutolightsError>> + Send {
        let exists = self.entities.lock().unwrap().contains_key(entity_id);
        async move { Ok(exists) }
    }
}

impl LightCommander for FakeHost {
    fn set_brightness(
        &self,
        entity_id: &EntityId,
        brightness: u8,
        transition_secs: u32,
    ) -> impl Future<Output = Result<(), AutolightsError>> + Send {
        let result = self.record(Command::SetBrightness {
            entity_id: entity_id.clone(),
            brightness,
            transition_secs,
        });
        if result.is_ok() {
            if self.dimmable.lock().unwrap().contains(entity_id) {
                self.set_raw(entity_id.as_str(), brightness);
            } else {
                self.set_on(entity_id.as_str(), brightness > 0);
            }
        }
        async move { result }
    }

    fn turn_off(
        &self,
        entity_id: &EntityId,
        transition_secs: u32,
    ) -> impl Future<Output = Result<(), AutolightsError>> + Send {
        let result = self.record(Command::TurnOff {
            entity_id: entity_id.clone(),
            transition_secs,
        });
        if result.is_ok() {
            self.set_on(entity_id.as_str(), false);
        }
        async move { result }
    }
}
