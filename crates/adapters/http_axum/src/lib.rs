//! # autolights-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Expose the latest **tracking table** snapshot (`/api/tracked`)
//! - Expose host **entity snapshots** (`/api/entities/{id}`)
//! - Accept **external state changes** (`PUT /api/entities/{id}/state`),
//!   standing in for a wall switch or a motion sensor on the virtual host
//!
//! ## Dependency rule
//! Depends on `autolights-app` (for port traits) and `autolights-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
