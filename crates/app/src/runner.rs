//! Event loop and tick source driving the controller.

use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use autolights_domain::event::ControllerEvent;
use autolights_domain::time::now;
use autolights_domain::tracking::TrackedEntity;

use crate::controller::AutoLights;
use crate::ports::{EventPublisher, LightCommander, StateReader};

/// Feed every bus event to `controller`, one at a time, until the bus closes.
///
/// After each event the table snapshot is published on `snapshots`. A lagging
/// receiver skips the lost events; the next tick reconciles whatever they
/// carried. Returns the controller once the bus is closed.
pub async fn run<H, C>(
    mut controller: AutoLights<H, C>,
    mut events: broadcast::Receiver<ControllerEvent>,
    snapshots: watch::Sender<Vec<TrackedEntity>>,
) -> AutoLights<H, C>
where
    H: StateReader + Send + Sync,
    C: LightCommander + Send + Sync,
{
    snapshots.send_replace(controller.snapshot());
    loop {
        match events.recv().await {
            Ok(event) => {
                tracing::trace!(%event, "handling event");
                controller.handle(&event).await;
                snapshots.send_replace(controller.snapshot());
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "controller fell behind the event bus");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    tracing::info!("event bus closed; controller stopped");
    controller
}

/// Publish a [`ControllerEvent::Tick`] every `period`.
///
/// The first tick fires one full period after the call.
pub fn spawn_ticker<P>(publisher: P, period: Duration) -> JoinHandle<()>
where
    P: EventPublisher + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(err) = publisher.publish(ControllerEvent::Tick { at: now() }).await {
                tracing::warn!(%err, "failed to publish tick");
            }
        }
    })
}
