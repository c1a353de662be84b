//! Trigger gate: whether an occupancy trigger's new state is actionable.
//!
//! The decision is split in two so that the dark-outside sensor is only read
//! when it matters: [`TriggerGate::evaluate`] settles everything that depends
//! on configuration alone, and [`TriggerGate::resolve`] finishes the
//! [`RequiresDarkness`](TriggerGate::RequiresDarkness) case.

use crate::entity::EntityState;

/// Outcome of evaluating a trigger state against configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerGate {
    /// The state is not one of the configured trigger states.
    Ignore,
    /// Triggers apply during the day; fire unconditionally.
    Fire,
    /// Fire only if it is dark outside.
    RequiresDarkness,
}

impl TriggerGate {
    #[must_use]
    pub fn evaluate(
        trigger_states: &[EntityState],
        trigger_during_day: bool,
        state: &EntityState,
    ) -> Self {
        if !trigger_states.contains(state) {
            Self::Ignore
        } else if trigger_during_day {
            Self::Fire
        } else {
            Self::RequiresDarkness
        }
    }

    /// Final decision given the dark-outside reading.
    #[must_use]
    pub fn resolve(self, dark_outside: bool) -> bool {
        match self {
            Self::Ignore => false,
            Self::Fire => true,
            Self::RequiresDarkness => dark_outside,
        }
    }
}
