//! Presence state.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// What the coordinator currently believes about the window and the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceState {
    /// Last focus value observed by the focus monitor.
    pub focused: bool,
    /// Whether the user is believed to be engaged with the overlay.
    pub user_interacting: bool,
    pub last_user_interaction_at: Instant,
    /// An OS-level interaction is in progress; enforcement is suspended.
    pub system_interaction_active: bool,
}

/// A change in observed focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTransition {
    Gained,
    Lost,
}

impl PresenceState {
    pub fn new(now: Instant) -> Self {
        Self {
            focused: false,
            user_interacting: false,
            last_user_interaction_at: now,
            system_interaction_active: false,
        }
    }

    /// Time elapsed since the last user interaction.
    pub fn idle(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_user_interaction_at)
    }

    pub fn record_user_interaction(&mut self, now: Instant) {
        if now > self.last_user_interaction_at {
            self.last_user_interaction_at = now;
        }
        self.user_interacting = true;
        self.system_interaction_active = false;
    }

    /// Both flags flip together: a system interaction is never also a user one.
    pub fn enter_system_interaction(&mut self) {
        self.system_interaction_active = true;
        self.user_interacting = false;
    }

    pub fn end_system_interaction(&mut self) {
        self.system_interaction_active = false;
    }

    /// Apply a focus observation, returning the transition if it changed.
    pub fn observe_focus(&mut self, focused: bool, now: Instant) -> Option<FocusTransition> {
        if focused == self.focused {
            return None;
        }

        self.focused = focused;
        if focused {
            self.user_interacting = true;
            self.last_user_interaction_at = now;
            self.system_interaction_active = false;
            Some(FocusTransition::Gained)
        } else {
            self.user_interacting = false;
            Some(FocusTransition::Lost)
        }
    }

    /// Clear `user_interacting` once idle time exceeds `timeout`.
    ///
    /// Returns true if the flag was cleared by this call.
    pub fn decay(&mut self, now: Instant, timeout: Duration) -> bool {
        if self.user_interacting && self.idle(now) > timeout {
            self.user_interacting = false;
            return true;
        }
        false
    }

    /// Whether always-on-top may be re-asserted right now.
    ///
    /// Enforcement stops once the user has been idle for `window`, so the
    /// overlay doesn't fight the window manager when nobody is using it.
    pub fn should_enforce(&self, now: Instant, window: Duration) -> bool {
        !self.system_interaction_active && self.idle(now) < window
    }

    pub fn snapshot(&self, now: Instant) -> PresenceSnapshot {
        PresenceSnapshot {
            focused: self.focused,
            user_interacting: self.user_interacting,
            system_interaction_active: self.system_interaction_active,
            idle_ms: u64::try_from(self.idle(now).as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Read-only copy of [`PresenceState`] for callers outside the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSnapshot {
    pub focused: bool,
    pub user_interacting: bool,
    pub system_interaction_active: bool,
    /// Milliseconds since the last user interaction.
    pub idle_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(3000);
    const WINDOW: Duration = Duration::from_millis(5000);

    #[test]
    fn test_initial_state() {
        let now = Instant::now();
        let state = PresenceState::new(now);

        assert!(!state.focused);
        assert!(!state.user_interacting);
        assert!(!state.system_interaction_active);
        assert_eq!(state.idle(now), Duration::ZERO);
    }

    #[test]
    fn test_system_interaction_clears_user_interacting() {
        let now = Instant::now();
        let mut state = PresenceState::new(now);
        state.record_user_interaction(now);
        assert!(state.user_interacting);

        state.enter_system_interaction();
        assert!(state.system_interaction_active);
        assert!(!state.user_interacting);
    }

    #[test]
    fn test_user_interaction_ends_system_interaction() {
        let now = Instant::now();
        let mut state = PresenceState::new(now);
        state.enter_system_interaction();

        state.record_user_interaction(now + Duration::from_millis(10));
        assert!(state.user_interacting);
        assert!(!state.system_interaction_active);
        assert_eq!(state.last_user_interaction_at, now + Duration::from_millis(10));
    }

    #[test]
    fn test_last_interaction_is_monotonic() {
        let now = Instant::now();
        let mut state = PresenceState::new(now + Duration::from_secs(1));
        state.record_user_interaction(now);
        assert_eq!(state.last_user_interaction_at, now + Duration::from_secs(1));
    }

    #[test]
    fn test_focus_transitions() {
        let start = Instant::now();
        let mut state = PresenceState::new(start);
        state.enter_system_interaction();

        let later = start + Duration::from_secs(10);
        assert_eq!(state.observe_focus(true, later), Some(FocusTransition::Gained));
        assert!(state.focused);
        assert!(state.user_interacting);
        assert!(!state.system_interaction_active);
        assert_eq!(state.last_user_interaction_at, later);

        assert_eq!(state.observe_focus(true, later), None);

        assert_eq!(state.observe_focus(false, later), Some(FocusTransition::Lost));
        assert!(!state.focused);
        assert!(!state.user_interacting);
    }

    #[test]
    fn test_decay_boundary() {
        let start = Instant::now();
        let mut state = PresenceState::new(start);
        state.record_user_interaction(start);

        assert!(!state.decay(start + TIMEOUT, TIMEOUT));
        assert!(state.user_interacting);

        assert!(state.decay(start + TIMEOUT + Duration::from_millis(1), TIMEOUT));
        assert!(!state.user_interacting);
    }

    #[test]
    fn test_should_enforce() {
        let start = Instant::now();
        let mut state = PresenceState::new(start);

        assert!(state.should_enforce(start + Duration::from_millis(4999), WINDOW));
        assert!(!state.should_enforce(start + WINDOW, WINDOW));

        state.enter_system_interaction();
        assert!(!state.should_enforce(start, WINDOW));
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let start = Instant::now();
        let state = PresenceState::new(start);
        let snapshot = state.snapshot(start + Duration::from_millis(1200));
        assert_eq!(snapshot.idle_ms, 1200);

        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json["userInteracting"], false);
        assert_eq!(json["idleMs"], 1200);
    }
}
