//! # autolights-domain
//!
//! Pure domain model for the autolights dimming controller.
//!
//! ## Responsibilities
//! - Foundational types: entity identifiers, error conventions, timestamps
//! - Host **entity snapshots** (state + attributes) and controller **events**
//! - The **brightness model**: normalized levels and transition plans
//! - The **tracking table**: per-light deadlines, manual flag, command stamps
//! - The **feedback filter** suppressing echoes of our own commands
//! - The **trigger gate** deciding whether a trigger state is actionable
//! - The immutable **controller configuration**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod brightness;
pub mod config;
pub mod entity;
pub mod event;
pub mod feedback;
pub mod tracking;
pub mod trigger;
