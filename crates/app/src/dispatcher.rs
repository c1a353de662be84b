//! Command dispatcher: turns a transition plan into a host command.
//!
//! Commands are fire-and-forget. A failed command is logged and the table
//! bookkeeping still happens; the next tick's reconciliation corrects any
//! drift between the table and the host.

use autolights_domain::brightness::{TransitionPlan, to_raw};
use autolights_domain::id::EntityId;
use autolights_domain::time::Timestamp;
use autolights_domain::tracking::TrackingTable;

use crate::ports::LightCommander;

/// Issues brightness commands and records their effect on the tracking table.
pub struct CommandDispatcher<C> {
    commander: C,
    cutoff: f64,
}

impl<C> CommandDispatcher<C>
where
    C: LightCommander + Send + Sync,
{
    /// Create a dispatcher that turns lights off at or below `cutoff`.
    pub fn new(commander: C, cutoff: f64) -> Self {
        Self { commander, cutoff }
    }

    /// Move `entity_id` from `current` to `target`, returning the executed plan.
    ///
    /// A cutoff untracks the light; a set stamps the command time so the
    /// resulting notification is recognised as an echo.
    pub async fn apply_brightness(
        &self,
        table: &mut TrackingTable,
        entity_id: &EntityId,
        current: f64,
        target: f64,
        transition_secs: u32,
        now: Timestamp,
    ) -> TransitionPlan {
        let plan = TransitionPlan::plan(current, target, self.cutoff);
        match plan {
            TransitionPlan::Noop => {
                tracing::debug!(%entity_id, raw = to_raw(target), "brightness already at target");
            }
            TransitionPlan::Cutoff => {
                tracing::info!(%entity_id, from = to_raw(current), "turning off");
                if let Err(err) = self.commander.turn_off(entity_id, transition_secs).await {
                    tracing::warn!(%err, %entity_id, "turn_off command failed");
                }
                table.untrack(entity_id);
            }
            TransitionPlan::Set(raw) => {
                tracing::info!(%entity_id, from = to_raw(current), to = raw, "setting brightness");
                table.stamp_command(entity_id, now);
                if let Err(err) = self
                    .commander
                    .set_brightness(entity_id, raw, transition_secs)
                    .await
                {
                    tracing::warn!(%err, %entity_id, "set_brightness command failed");
                }
            }
        }
        plan
    }
}
