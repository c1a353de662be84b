//! Event bus port: delivers controller events (host notifications, ticks).

use std::future::Future;

use autolights_domain::error::AutolightsError;
use autolights_domain::event::ControllerEvent;

/// Publishes controller events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(
        &self,
        event: ControllerEvent,
    ) -> impl Future<Output = Result<(), AutolightsError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        event: ControllerEvent,
    ) -> impl Future<Output = Result<(), AutolightsError>> + Send {
        (**self).publish(event)
    }
}
