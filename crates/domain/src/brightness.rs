//! Brightness model: normalized levels, raw device values, transition plans.
//!
//! Levels are `f64` in `[0, 1]`; devices speak integers in `0..=255`. Every
//! comparison happens on the rounded device value so that normalization
//! noise never produces a command.

use crate::entity::Entity;

/// Highest raw brightness a device accepts.
pub const MAX_RAW_BRIGHTNESS: u8 = 255;

/// Normalized level of an entity snapshot.
///
/// Dimmable lights report a numeric `brightness` which is normalized; lights
/// without one (or with a zero/null value) are `1.0` when `on`, else `0.0`.
/// A missing snapshot reads as `0.0`.
#[must_use]
pub fn read_level(entity: Option<&Entity>) -> f64 {
    let Some(entity) = entity else {
        return 0.0;
    };
    match entity.brightness() {
        Some(raw) if raw > 0.0 => clamp_level(raw / f64::from(MAX_RAW_BRIGHTNESS)),
        _ if entity.is_on() => 1.0,
        _ => 0.0,
    }
}

/// Round a normalized level to the device's native resolution.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_raw(level: f64) -> u8 {
    (clamp_level(level) * f64::from(MAX_RAW_BRIGHTNESS)).round() as u8
}

/// Convert a raw device value back to a normalized level.
#[must_use]
pub fn from_raw(raw: u8) -> f64 {
    f64::from(raw) / f64::from(MAX_RAW_BRIGHTNESS)
}

fn clamp_level(level: f64) -> f64 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

/// What to do to move a light from its current level to a target level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Current and target round to the same device value.
    Noop,
    /// The target is at or below the cutoff threshold: turn the light off.
    Cutoff,
    /// Set the raw brightness.
    Set(u8),
}

impl TransitionPlan {
    /// Decide how to move from `current` to `target`.
    ///
    /// `cutoff` is a normalized threshold; a rounded target at or below it
    /// turns the light off.
    #[must_use]
    pub fn plan(current: f64, target: f64, cutoff: f64) -> Self {
        let raw_current = to_raw(current);
        let raw_target = to_raw(target);
        if raw_current == raw_target {
            Self::Noop
        } else if from_raw(raw_target) <= cutoff {
            Self::Cutoff
        } else {
            Self::Set(raw_target)
        }
    }

    /// Whether the light is still lit after executing this plan from `current`.
    #[must_use]
    pub fn leaves_light_on(self, current: f64) -> bool {
        match self {
            Self::Set(_) => true,
            Self::Cutoff => false,
            Self::Noop => to_raw(current) > 0,
        }
    }
}

impl std::fmt::Display for TransitionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Noop => f.write_str("noop"),
            Self::Cutoff => f.write_str("cutoff"),
            Self::Set(raw) => write!(f, "set({raw})"),
        }
    }
}
