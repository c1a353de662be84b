//! # autolights-app
//!
//! Application layer: the dimming controller, its event loop and the
//! **port definitions** (traits) adapters implement.
//!
//! ## Responsibilities
//! - Define **port traits** for the host collaborator:
//!   - `StateReader`: entity snapshots and existence checks
//!   - `LightCommander`: one-way brightness and turn-off commands
//!   - `StateWriter`: externally caused changes (operator surfaces, tests)
//!   - `EventPublisher`: pushing controller events onto the bus
//! - Run the `AutoLights` controller against those ports
//! - Provide **in-process infrastructure** (event bus, runner, ticker)
//!
//! ## Dependency rule
//! Depends on `autolights-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod controller;
pub mod dispatcher;
pub mod event_bus;
pub mod ports;
pub mod runner;

#[cfg(test)]
mod testing;
