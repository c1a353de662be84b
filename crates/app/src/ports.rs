//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the controller and the host automation
//! platform. They are defined here (in `app`) so that both the controller and
//! the adapter layer can depend on them without creating circular
//! dependencies.

pub mod event_bus;
pub mod host;

pub use event_bus::EventPublisher;
pub use host::{LightCommander, StateReader, StateWriter};
