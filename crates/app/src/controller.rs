//! The autolights controller.
//!
//! Lights switched on by a person are held at their level for
//! `initial_minutes`, then dimmed by `dim_increment` every `update_minutes`
//! until they fall to the cutoff threshold and are turned off. Triggers
//! (typically motion sensors) brighten every managed light and hold it for
//! `trigger_minutes`, after which a light that was off before is cut.
//!
//! All decisions take the timestamp of the event being handled; the
//! controller never reads the wall clock itself.

use std::sync::Arc;

use autolights_domain::brightness::{TransitionPlan, read_level, to_raw};
use autolights_domain::config::ControllerConfig;
use autolights_domain::entity::{Entity, EntityState};
use autolights_domain::error::AutolightsError;
use autolights_domain::event::{ControllerEvent, StateChange};
use autolights_domain::feedback::FeedbackFilter;
use autolights_domain::id::EntityId;
use autolights_domain::time::Timestamp;
use autolights_domain::tracking::{TrackedEntity, TrackingTable};
use autolights_domain::trigger::TriggerGate;

use crate::dispatcher::CommandDispatcher;
use crate::ports::{LightCommander, StateReader};

/// Occupancy-driven dimming controller.
///
/// Owns the [`TrackingTable`]; every handler takes `&mut self`, so events are
/// processed strictly one at a time.
pub struct AutoLights<H, C> {
    config: Arc<ControllerConfig>,
    host: H,
    dispatcher: CommandDispatcher<C>,
    filter: FeedbackFilter,
    table: TrackingTable,
}

impl<H, C> AutoLights<H, C>
where
    H: StateReader + Send + Sync,
    C: LightCommander + Send + Sync,
{
    /// Validate `config` against the host and build the controller.
    ///
    /// Lights and triggers the host does not know are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-range levels, or a host error
    /// if existence checks fail.
    pub async fn setup(
        mut config: ControllerConfig,
        host: H,
        commander: C,
    ) -> Result<Self, AutolightsError> {
        config.validate()?;
        config.lights = retain_existing(&host, config.lights, "light").await?;
        config.triggers = retain_existing(&host, config.triggers, "trigger").await?;

        if !config.triggers.is_empty()
            && !config.trigger_during_day
            && !host.entity_exists(&config.dark_outside_entity).await?
        {
            tracing::warn!(
                entity_id = %config.dark_outside_entity,
                "dark-outside sensor not found; triggers will only fire once it reports on"
            );
        }

        tracing::info!(
            lights = config.lights.len(),
            triggers = config.triggers.len(),
            "autolights configured"
        );

        Ok(Self {
            dispatcher: CommandDispatcher::new(commander, config.threshold_level),
            config: Arc::new(config),
            host,
            filter: FeedbackFilter::default(),
            table: TrackingTable::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[must_use]
    pub fn table(&self) -> &TrackingTable {
        &self.table
    }

    /// Sorted copy of the tracking table for inspection.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TrackedEntity> {
        self.table.snapshot()
    }

    /// Startup sync: adopt every light that is already on.
    pub async fn initialize(&mut self, now: Timestamp) {
        let config = Arc::clone(&self.config);
        for light in &config.lights {
            self.notify_light(light, now).await;
        }
        tracing::debug!(tracked = self.table.len(), "initial sync complete");
    }

    /// Dispatch one event from the bus.
    pub async fn handle(&mut self, event: &ControllerEvent) {
        match event {
            ControllerEvent::StateChanged(change) => self.on_state_changed(change).await,
            ControllerEvent::Tick { at } => self.tick(*at).await,
        }
    }

    async fn on_state_changed(&mut self, change: &StateChange) {
        if change.is_state_change() && self.config.triggers.contains(&change.entity_id) {
            self.notify_trigger(&change.entity_id, &change.to, change.at)
                .await;
        }
        if self.config.lights.contains(&change.entity_id) {
            self.notify_light(&change.entity_id, change.at).await;
        }
    }

    /// Periodic pass: refresh triggers, reconcile, then run due rows.
    pub async fn tick(&mut self, now: Timestamp) {
        let config = Arc::clone(&self.config);

        for trigger in &config.triggers {
            let state = self
                .read_entity(trigger)
                .await
                .map(|entity| entity.state)
                .unwrap_or_default();
            self.notify_trigger(trigger, &state, now).await;
        }

        for light in &config.lights {
            let on = self
                .read_entity(light)
                .await
                .is_some_and(|entity| entity.is_on());
            if on != self.table.contains(light) {
                tracing::debug!(entity_id = %light, on, "light out of sync with tracking table");
                self.notify_light(light, now).await;
            }
        }

        for entity_id in self.table.due(now) {
            let Some(manual) = self.table.get(&entity_id).map(|row| row.manual) else {
                continue;
            };
            let current = self.read_level(&entity_id).await;
            if manual {
                let target = current.min((current - config.dim_increment).max(config.min_dim_level));
                self.dispatcher
                    .apply_brightness(
                        &mut self.table,
                        &entity_id,
                        current,
                        target,
                        config.dim_transition_seconds,
                        now,
                    )
                    .await;
                if self.table.contains(&entity_id) {
                    self.table
                        .schedule_update(&entity_id, now, config.update_minutes, false);
                }
            } else {
                let plan = self
                    .dispatcher
                    .apply_brightness(
                        &mut self.table,
                        &entity_id,
                        current,
                        0.0,
                        config.dim_transition_seconds,
                        now,
                    )
                    .await;
                if plan == TransitionPlan::Noop {
                    tracing::debug!(%entity_id, "trigger hold expired on a dark light");
                    self.table.untrack(&entity_id);
                }
            }
        }
    }

    /// A trigger changed (or is being refreshed): brighten every light.
    pub async fn notify_trigger(
        &mut self,
        trigger_id: &EntityId,
        state: &EntityState,
        now: Timestamp,
    ) {
        if !self.can_trigger(trigger_id, state).await {
            return;
        }
        let config = Arc::clone(&self.config);
        for light in &config.lights {
            let current = self.read_level(light).await;
            let target = current.max(config.trigger_level);
            let plan = self
                .dispatcher
                .apply_brightness(
                    &mut self.table,
                    light,
                    current,
                    target,
                    config.trigger_transition_seconds,
                    now,
                )
                .await;
            if plan.leaves_light_on(current) {
                self.table
                    .schedule_update(light, now, config.trigger_minutes, false);
            }
        }
    }

    /// Whether `state` of `trigger_id` should brighten the lights right now.
    pub async fn can_trigger(&self, trigger_id: &EntityId, state: &EntityState) -> bool {
        let gate = TriggerGate::evaluate(
            &self.config.trigger_states,
            self.config.trigger_during_day,
            state,
        );
        match gate {
            TriggerGate::Ignore => {
                tracing::debug!(%trigger_id, %state, "state is not a trigger state");
                false
            }
            TriggerGate::Fire => true,
            TriggerGate::RequiresDarkness => {
                let dark = self
                    .read_entity(&self.config.dark_outside_entity)
                    .await
                    .is_some_and(|entity| entity.is_on());
                if !dark {
                    tracing::debug!(%trigger_id, "ignoring trigger during daylight");
                }
                gate.resolve(dark)
            }
        }
    }

    /// A managed light changed: adopt it as manual, or drop it once dark.
    pub async fn notify_light(&mut self, light_id: &EntityId, now: Timestamp) {
        let last_command = self.table.get(light_id).and_then(|row| row.last_update_time);
        if self.filter.is_echo(last_command, now) {
            tracing::debug!(entity_id = %light_id, "ignoring echo of our own command");
            return;
        }

        if to_raw(self.read_level(light_id).await) == 0 {
            if self.table.untrack(light_id).is_some() {
                tracing::info!(entity_id = %light_id, "light is off; no longer tracking");
            }
            return;
        }

        let row = self
            .table
            .schedule_update(light_id, now, self.config.initial_minutes, true);
        tracing::debug!(
            entity_id = %light_id,
            next_update = ?row.next_update_time,
            "tracking manually controlled light"
        );
    }

    async fn read_level(&self, entity_id: &EntityId) -> f64 {
        read_level(self.read_entity(entity_id).await.as_ref())
    }

    async fn read_entity(&self, entity_id: &EntityId) -> Option<Entity> {
        match self.host.get_entity(entity_id).await {
            Ok(entity) => entity,
            Err(err) => {
                tracing::warn!(%err, %entity_id, "failed to read entity; treating it as off");
                None
            }
        }
    }
}

async fn retain_existing<H>(
    host: &H,
    ids: Vec<EntityId>,
    kind: &'static str,
) -> Result<Vec<EntityId>, AutolightsError>
where
    H: StateReader + Send + Sync,
{
    let mut kept = Vec::with_capacity(ids.len());
    for entity_id in ids {
        if host.entity_exists(&entity_id).await? {
            kept.push(entity_id);
        } else {
            tracing::warn!(%entity_id, kind, "configured entity not found; ignoring it");
        }
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeDelta, TimeZone, Utc};

    use super::*;
    use crate::testing::{Command, FakeHost, id};
    use autolights_domain::time::minutes;

    const KITCHEN: &str = "light.kitchen";
    const PORCH: &str = "light.porch";
    const MOTION: &str = "binary_sensor.hallway_motion";
    const DARK: &str = "binary_sensor.dark_outside";

    type Controller = AutoLights<Arc<FakeHost>, Arc<FakeHost>>;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 1, 21, 0, 0).unwrap()
    }

    fn secs(count: i64) -> TimeDelta {
        TimeDelta::seconds(count)
    }

    fn config() -> ControllerConfig {
        ControllerConfig {
            lights: vec![id(KITCHEN)],
            triggers: vec![id(MOTION)],
            initial_minutes: 30,
            update_minutes: 15,
            trigger_minutes: 10,
            dim_increment: 0.2,
            threshold_level: 0.1,
            ..ControllerConfig::default()
        }
    }

    fn night_host() -> Arc<FakeHost> {
        Arc::new(
            FakeHost::default()
                .with_dimmable(KITCHEN, 0)
                .with_sensor(MOTION, "off")
                .with_sensor(DARK, "on"),
        )
    }

    async fn controller(config: ControllerConfig, host: &Arc<FakeHost>) -> Controller {
        AutoLights::setup(config, Arc::clone(host), Arc::clone(host))
            .await
            .unwrap()
    }

    fn changed(raw_id: &str, to: &str, at: Timestamp) -> ControllerEvent {
        ControllerEvent::StateChanged(StateChange {
            entity_id: id(raw_id),
            attribute: None,
            from: None,
            to: EntityState::from(to),
            at,
        })
    }

    fn attribute_changed(raw_id: &str, at: Timestamp) -> ControllerEvent {
        ControllerEvent::StateChanged(StateChange {
            entity_id: id(raw_id),
            attribute: Some("brightness".to_string()),
            from: None,
            to: EntityState::On,
            at,
        })
    }

    /// A person sets the light and the host reports it.
    async fn manual_set(ctl: &mut Controller, host: &FakeHost, raw: u8, at: Timestamp) {
        host.set_raw(KITCHEN, raw);
        ctl.handle(&changed(KITCHEN, if raw > 0 { "on" } else { "off" }, at))
            .await;
    }

    // ── Setup ──

    #[tokio::test]
    async fn should_drop_unknown_lights_and_triggers_at_setup() {
        let host = night_host();
        let config = ControllerConfig {
            lights: vec![id(KITCHEN), id("light.missing")],
            triggers: vec![id(MOTION), id("binary_sensor.missing")],
            ..config()
        };

        let ctl = controller(config, &host).await;

        assert_eq!(ctl.config().lights, vec![id(KITCHEN)]);
        assert_eq!(ctl.config().triggers, vec![id(MOTION)]);
    }

    #[tokio::test]
    async fn should_reject_out_of_range_levels_at_setup() {
        let host = night_host();
        let config = ControllerConfig {
            trigger_level: 2.0,
            ..config()
        };

        let result = AutoLights::setup(config, Arc::clone(&host), Arc::clone(&host)).await;

        assert!(matches!(result, Err(AutolightsError::Validation(_))));
    }

    #[tokio::test]
    async fn should_adopt_lights_already_on_at_startup() {
        let host = night_host();
        host.set_raw(KITCHEN, 200);
        let mut ctl = controller(config(), &host).await;

        ctl.initialize(t0()).await;

        let row = ctl.table().get(&id(KITCHEN)).unwrap();
        assert!(row.manual);
        assert_eq!(row.next_update_time, Some(t0() + minutes(30)));
        assert!(host.commands().is_empty());
    }

    #[tokio::test]
    async fn should_leave_dark_lights_untracked_at_startup() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;

        ctl.initialize(t0()).await;

        assert!(ctl.table().is_empty());
    }

    // ── Manual control ──

    #[tokio::test]
    async fn should_track_manual_switch_on() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;

        manual_set(&mut ctl, &host, 255, t0()).await;

        let row = ctl.table().get(&id(KITCHEN)).unwrap();
        assert!(row.manual);
        assert_eq!(row.next_update_time, Some(t0() + minutes(30)));
        assert_eq!(row.last_update_time, None);
        assert!(host.commands().is_empty());
    }

    #[tokio::test]
    async fn should_untrack_when_light_turned_off_by_hand() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;
        manual_set(&mut ctl, &host, 255, t0()).await;

        manual_set(&mut ctl, &host, 0, t0() + minutes(1)).await;

        assert!(ctl.table().is_empty());
    }

    #[tokio::test]
    async fn should_not_shorten_an_existing_deadline() {
        let host = night_host();
        let config = ControllerConfig {
            trigger_minutes: 60,
            trigger_during_day: true,
            ..config()
        };
        let mut ctl = controller(config, &host).await;
        host.set_on(MOTION, true);
        ctl.handle(&changed(MOTION, "on", t0())).await;

        // manual adjustment well past the echo window
        manual_set(&mut ctl, &host, 180, t0() + minutes(1)).await;

        let row = ctl.table().get(&id(KITCHEN)).unwrap();
        assert!(row.manual);
        assert_eq!(row.next_update_time, Some(t0() + minutes(60)));
    }

    #[tokio::test]
    async fn should_decay_manual_light_then_cut_it() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;
        manual_set(&mut ctl, &host, 255, t0()).await;

        // first decay step once the initial hold has strictly passed
        let first = t0() + minutes(30) + secs(1);
        ctl.tick(first).await;
        assert_eq!(
            host.commands(),
            vec![Command::SetBrightness {
                entity_id: id(KITCHEN),
                brightness: 204,
                transition_secs: 30
            }]
        );
        let row = ctl.table().get(&id(KITCHEN)).unwrap();
        assert_eq!(row.last_update_time, Some(first));
        assert_eq!(row.next_update_time, Some(first + minutes(15)));

        // the host echo of our own command is suppressed
        ctl.handle(&attribute_changed(KITCHEN, first + secs(1))).await;
        assert_eq!(
            ctl.table().get(&id(KITCHEN)).unwrap().next_update_time,
            Some(first + minutes(15))
        );

        let mut at = first;
        for expected in [153, 102, 51] {
            at += minutes(15) + secs(1);
            host.clear_commands();
            ctl.tick(at).await;
            assert_eq!(
                host.commands(),
                vec![Command::SetBrightness {
                    entity_id: id(KITCHEN),
                    brightness: expected,
                    transition_secs: 30
                }]
            );
        }

        // 51 - 51 reaches zero, which is below the cutoff
        at += minutes(15) + secs(1);
        host.clear_commands();
        ctl.tick(at).await;
        assert_eq!(
            host.commands(),
            vec![Command::TurnOff {
                entity_id: id(KITCHEN),
                transition_secs: 30
            }]
        );
        assert!(ctl.table().is_empty());
    }

    #[tokio::test]
    async fn should_stop_decaying_at_minimum_level() {
        let host = night_host();
        let config = ControllerConfig {
            min_dim_level: 0.5,
            ..config()
        };
        let mut ctl = controller(config, &host).await;
        manual_set(&mut ctl, &host, 153, t0()).await;

        let first = t0() + minutes(30) + secs(1);
        ctl.tick(first).await;
        assert_eq!(to_raw(host.level(KITCHEN)), 128);

        host.clear_commands();
        let second = first + minutes(15) + secs(1);
        ctl.tick(second).await;

        assert!(host.commands().is_empty());
        let row = ctl.table().get(&id(KITCHEN)).unwrap();
        assert_eq!(row.next_update_time, Some(second + minutes(15)));
    }

    #[tokio::test]
    async fn should_not_raise_light_below_minimum_when_decaying() {
        let host = night_host();
        let config = ControllerConfig {
            min_dim_level: 0.5,
            ..config()
        };
        let mut ctl = controller(config, &host).await;
        manual_set(&mut ctl, &host, 51, t0()).await;

        ctl.tick(t0() + minutes(30) + secs(1)).await;

        assert!(host.commands().is_empty());
        assert!(ctl.table().contains(&id(KITCHEN)));
    }

    #[tokio::test]
    async fn should_wait_until_deadline_strictly_passes() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;
        manual_set(&mut ctl, &host, 255, t0()).await;

        ctl.tick(t0() + minutes(30)).await;

        assert!(host.commands().is_empty());
    }

    #[tokio::test]
    async fn should_treat_change_after_window_as_manual() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;
        manual_set(&mut ctl, &host, 255, t0()).await;
        let first = t0() + minutes(30) + secs(1);
        ctl.tick(first).await;

        // a person nudges the light six seconds after our command
        let nudge = first + secs(6);
        manual_set(&mut ctl, &host, 230, nudge).await;

        let row = ctl.table().get(&id(KITCHEN)).unwrap();
        assert_eq!(row.next_update_time, Some(nudge + minutes(30)));
    }

    #[tokio::test]
    async fn should_suppress_change_at_window_boundary() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;
        manual_set(&mut ctl, &host, 255, t0()).await;
        let first = t0() + minutes(30) + secs(1);
        ctl.tick(first).await;

        manual_set(&mut ctl, &host, 0, first + secs(5)).await;

        assert!(ctl.table().contains(&id(KITCHEN)));
    }

    #[tokio::test]
    async fn should_tick_idempotently() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;
        manual_set(&mut ctl, &host, 255, t0()).await;
        let first = t0() + minutes(30) + secs(1);
        ctl.tick(first).await;
        let snapshot = ctl.snapshot();
        let commands = host.commands();

        ctl.tick(first).await;

        assert_eq!(ctl.snapshot(), snapshot);
        assert_eq!(host.commands(), commands);
    }

    // ── Triggers ──

    #[tokio::test]
    async fn should_brighten_and_hold_on_trigger_at_night() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;

        host.set_on(MOTION, true);
        ctl.handle(&changed(MOTION, "on", t0())).await;

        assert_eq!(
            host.commands(),
            vec![Command::SetBrightness {
                entity_id: id(KITCHEN),
                brightness: 255,
                transition_secs: 0
            }]
        );
        let row = ctl.table().get(&id(KITCHEN)).unwrap();
        assert!(!row.manual);
        assert_eq!(row.next_update_time, Some(t0() + minutes(10)));
        assert_eq!(row.last_update_time, Some(t0()));

        // the echo of the set is not adopted as manual
        ctl.handle(&changed(KITCHEN, "on", t0() + secs(1))).await;
        assert!(!ctl.table().get(&id(KITCHEN)).unwrap().manual);
    }

    #[tokio::test]
    async fn should_cut_trigger_lit_light_after_hold() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;
        host.set_on(MOTION, true);
        ctl.handle(&changed(MOTION, "on", t0())).await;
        host.set_on(MOTION, false);
        ctl.handle(&changed(MOTION, "off", t0() + minutes(1))).await;
        host.clear_commands();

        ctl.tick(t0() + minutes(10)).await;
        assert!(host.commands().is_empty());

        let expiry = t0() + minutes(10) + secs(1);
        ctl.tick(expiry).await;

        assert_eq!(
            host.commands(),
            vec![Command::TurnOff {
                entity_id: id(KITCHEN),
                transition_secs: 30
            }]
        );
        assert!(ctl.table().is_empty());
    }

    #[tokio::test]
    async fn should_extend_hold_while_trigger_stays_active() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;
        host.set_on(MOTION, true);
        ctl.handle(&changed(MOTION, "on", t0())).await;

        let later = t0() + minutes(9);
        ctl.tick(later).await;

        let row = ctl.table().get(&id(KITCHEN)).unwrap();
        assert_eq!(row.next_update_time, Some(later + minutes(10)));
    }

    #[tokio::test]
    async fn should_ignore_trigger_during_daylight() {
        let host = night_host();
        host.set_on(DARK, false);
        let mut ctl = controller(config(), &host).await;

        host.set_on(MOTION, true);
        ctl.handle(&changed(MOTION, "on", t0())).await;

        assert!(host.commands().is_empty());
        assert!(ctl.table().is_empty());
    }

    #[tokio::test]
    async fn should_fire_during_day_when_configured() {
        let host = night_host();
        host.set_on(DARK, false);
        let config = ControllerConfig {
            trigger_during_day: true,
            ..config()
        };
        let ctl = controller(config, &host).await;

        assert!(ctl.can_trigger(&id(MOTION), &EntityState::On).await);
    }

    #[tokio::test]
    async fn should_treat_missing_dark_sensor_as_daylight() {
        let host = night_host();
        host.remove(DARK);
        let ctl = controller(config(), &host).await;

        assert!(!ctl.can_trigger(&id(MOTION), &EntityState::On).await);
    }

    #[tokio::test]
    async fn should_ignore_states_outside_trigger_states() {
        let host = night_host();
        let ctl = controller(config(), &host).await;

        assert!(!ctl.can_trigger(&id(MOTION), &EntityState::Off).await);
        assert!(!ctl.can_trigger(&id(MOTION), &EntityState::Unavailable).await);
        assert!(ctl.can_trigger(&id(MOTION), &EntityState::On).await);
    }

    #[tokio::test]
    async fn should_ignore_trigger_attribute_changes() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;

        ctl.handle(&attribute_changed(MOTION, t0())).await;

        assert!(host.commands().is_empty());
    }

    #[tokio::test]
    async fn should_not_dim_a_brighter_light_on_trigger() {
        let host = night_host();
        let config = ControllerConfig {
            trigger_level: 0.4,
            ..config()
        };
        let mut ctl = controller(config, &host).await;
        manual_set(&mut ctl, &host, 200, t0()).await;

        host.set_on(MOTION, true);
        ctl.handle(&changed(MOTION, "on", t0() + minutes(1))).await;

        assert!(host.commands().is_empty());
        let row = ctl.table().get(&id(KITCHEN)).unwrap();
        assert!(row.manual);
        assert_eq!(row.next_update_time, Some(t0() + minutes(30)));
    }

    #[tokio::test]
    async fn should_keep_manual_flag_when_trigger_brightens() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;
        manual_set(&mut ctl, &host, 100, t0()).await;

        host.set_on(MOTION, true);
        ctl.handle(&changed(MOTION, "on", t0() + minutes(1))).await;

        let row = ctl.table().get(&id(KITCHEN)).unwrap();
        assert!(row.manual);
        assert_eq!(to_raw(host.level(KITCHEN)), 255);
    }

    #[tokio::test]
    async fn should_leave_dark_light_untracked_when_trigger_level_is_zero() {
        let host = night_host();
        let config = ControllerConfig {
            trigger_level: 0.0,
            ..config()
        };
        let mut ctl = controller(config, &host).await;

        host.set_on(MOTION, true);
        ctl.handle(&changed(MOTION, "on", t0())).await;

        assert!(host.commands().is_empty());
        assert!(ctl.table().is_empty());
    }

    // ── On/off lights ──

    #[tokio::test]
    async fn should_treat_on_off_light_as_full_level() {
        let host = Arc::new(
            FakeHost::default()
                .with_switch(PORCH, true)
                .with_sensor(DARK, "on"),
        );
        let config = ControllerConfig {
            lights: vec![id(PORCH)],
            triggers: Vec::new(),
            ..config()
        };
        let mut ctl = controller(config, &host).await;
        ctl.initialize(t0()).await;

        ctl.tick(t0() + minutes(30) + secs(1)).await;

        assert_eq!(
            host.commands(),
            vec![Command::SetBrightness {
                entity_id: id(PORCH),
                brightness: 204,
                transition_secs: 30
            }]
        );
    }

    // ── Reconciliation and failures ──

    #[tokio::test]
    async fn should_reconcile_light_turned_on_without_notification() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;

        host.set_raw(KITCHEN, 128);
        ctl.tick(t0()).await;

        let row = ctl.table().get(&id(KITCHEN)).unwrap();
        assert!(row.manual);
        assert_eq!(row.next_update_time, Some(t0() + minutes(30)));
    }

    #[tokio::test]
    async fn should_reconcile_light_turned_off_without_notification() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;
        manual_set(&mut ctl, &host, 255, t0()).await;

        host.set_raw(KITCHEN, 0);
        ctl.tick(t0() + minutes(1)).await;

        assert!(ctl.table().is_empty());
        assert!(host.commands().is_empty());
    }

    #[tokio::test]
    async fn should_keep_bookkeeping_when_commands_fail() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;
        host.set_on(MOTION, true);
        host.fail_commands(true);

        ctl.handle(&changed(MOTION, "on", t0())).await;

        assert_eq!(host.commands().len(), 1);
        let row = ctl.table().get(&id(KITCHEN)).unwrap();
        assert_eq!(row.last_update_time, Some(t0()));
    }

    #[tokio::test]
    async fn should_treat_unreadable_host_as_off() {
        let host = night_host();
        let mut ctl = controller(config(), &host).await;
        manual_set(&mut ctl, &host, 255, t0()).await;

        host.fail_reads(true);
        ctl.handle(&changed(KITCHEN, "on", t0() + minutes(1))).await;

        assert!(ctl.table().is_empty());
    }

    #[tokio::test]
    async fn should_only_command_configured_lights() {
        let host = Arc::new(
            FakeHost::default()
                .with_dimmable(KITCHEN, 0)
                .with_dimmable("light.bedroom", 0)
                .with_sensor(MOTION, "off")
                .with_sensor(DARK, "on"),
        );
        let mut ctl = controller(config(), &host).await;

        host.set_on(MOTION, true);
        ctl.handle(&changed(MOTION, "on", t0())).await;
        ctl.handle(&changed("light.bedroom", "on", t0())).await;

        assert!(
            host.commands()
                .iter()
                .all(|command| command.entity_id() == &id(KITCHEN))
        );
        assert!(!ctl.table().contains(&id("light.bedroom")));
    }
}
