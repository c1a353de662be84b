//! Shared application state for axum handlers.

use std::sync::Arc;

use tokio::sync::watch;

use autolights_domain::tracking::TrackedEntity;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the host type itself does not need to
/// be `Clone`; only the `Arc` and the watch receiver are cloned.
pub struct AppState<H> {
    /// Host entities, read and written through the host ports.
    pub host: Arc<H>,
    /// Latest tracking table snapshot published by the controller loop.
    pub tracked: watch::Receiver<Vec<TrackedEntity>>,
}

impl<H> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            tracked: self.tracked.clone(),
        }
    }
}

impl<H> AppState<H> {
    pub fn new(host: Arc<H>, tracked: watch::Receiver<Vec<TrackedEntity>>) -> Self {
        Self { host, tracked }
    }
}
