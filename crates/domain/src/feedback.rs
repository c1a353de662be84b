//! Feedback filter: drops notifications caused by the controller's own commands.

use chrono::TimeDelta;

use crate::time::Timestamp;

/// Width of the echo window after a command, in seconds.
pub const FEEDBACK_WINDOW_SECS: i64 = 5;

/// Decides whether a light notification is an echo of our last command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackFilter {
    window: TimeDelta,
}

impl Default for FeedbackFilter {
    fn default() -> Self {
        Self::new(TimeDelta::seconds(FEEDBACK_WINDOW_SECS))
    }
}

impl FeedbackFilter {
    #[must_use]
    pub fn new(window: TimeDelta) -> Self {
        Self { window }
    }

    #[must_use]
    pub fn window(&self) -> TimeDelta {
        self.window
    }

    /// `true` when `observed_at` falls within the window following
    /// `last_command` (both ends inclusive).
    #[must_use]
    pub fn is_echo(&self, last_command: Option<Timestamp>, observed_at: Timestamp) -> bool {
        last_command.is_some_and(|issued| observed_at - issued <= self.window)
    }
}
