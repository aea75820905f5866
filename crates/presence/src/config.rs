//! Coordinator configuration.
//!
//! [`PresenceSettings`] is the serializable half (what the plugin reads from
//! `tauri.conf.json` or the settings command). [`CoordinatorConfig`] adds the
//! focus callbacks and is what [`PresenceCoordinator::start`] consumes.
//!
//! [`PresenceCoordinator::start`]: crate::PresenceCoordinator::start

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Default interval between focus checks.
pub const DEFAULT_FOCUS_CHECK_INTERVAL: Duration = Duration::from_millis(2000);

/// Idle time after which the user is no longer considered interacting.
pub const DEFAULT_INTERACTION_TIMEOUT: Duration = Duration::from_millis(3000);

/// Always-on-top is only re-asserted while idle time is below this.
pub const DEFAULT_ENFORCEMENT_WINDOW: Duration = Duration::from_millis(5000);

/// Delay before a window blur clears the interacting flag.
pub const DEFAULT_BLUR_DEBOUNCE: Duration = Duration::from_millis(500);

/// Delay before visibility returning to `visible` lifts system suppression.
pub const DEFAULT_VISIBILITY_GRACE: Duration = Duration::from_millis(1000);

/// How long always-on-top is suspended on a system interaction.
pub const DEFAULT_SUSPEND_DURATION: Duration = Duration::from_millis(3000);

/// Callback invoked on a focus transition.
pub type FocusCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Heuristic timings used by the coordinator.
///
/// The defaults are empirical; tune them per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceTimings {
    pub interaction_timeout: Duration,
    pub enforcement_window: Duration,
    pub blur_debounce: Duration,
    pub visibility_grace: Duration,
    pub suspend_duration: Duration,
}

impl Default for PresenceTimings {
    fn default() -> Self {
        Self {
            interaction_timeout: DEFAULT_INTERACTION_TIMEOUT,
            enforcement_window: DEFAULT_ENFORCEMENT_WINDOW,
            blur_debounce: DEFAULT_BLUR_DEBOUNCE,
            visibility_grace: DEFAULT_VISIBILITY_GRACE,
            suspend_duration: DEFAULT_SUSPEND_DURATION,
        }
    }
}

/// Immutable configuration for one coordinator session.
#[derive(Clone)]
pub struct CoordinatorConfig {
    /// Keep the window pinned above other windows while the user is engaged.
    pub maintain_always_on_top: bool,
    /// Yield to OS-level shortcuts (task switcher, launcher) and debounce blur.
    pub respect_system_interactions: bool,
    /// Suspend always-on-top for a while when a system interaction is seen.
    pub auto_hide_on_system_interaction: bool,
    /// Period of the focus monitor.
    pub focus_check_interval: Duration,
    pub timings: PresenceTimings,
    pub on_focus_lost: Option<FocusCallback>,
    pub on_focus_gained: Option<FocusCallback>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            maintain_always_on_top: true,
            respect_system_interactions: true,
            auto_hide_on_system_interaction: false,
            focus_check_interval: DEFAULT_FOCUS_CHECK_INTERVAL,
            timings: PresenceTimings::default(),
            on_focus_lost: None,
            on_focus_gained: None,
        }
    }
}

impl CoordinatorConfig {
    pub fn with_on_focus_gained<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_focus_gained = Some(Arc::new(callback));
        self
    }

    pub fn with_on_focus_lost<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_focus_lost = Some(Arc::new(callback));
        self
    }
}

impl std::fmt::Debug for CoordinatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorConfig")
            .field("maintain_always_on_top", &self.maintain_always_on_top)
            .field("respect_system_interactions", &self.respect_system_interactions)
            .field(
                "auto_hide_on_system_interaction",
                &self.auto_hide_on_system_interaction,
            )
            .field("focus_check_interval", &self.focus_check_interval)
            .field("timings", &self.timings)
            .field("has_on_focus_lost", &self.on_focus_lost.is_some())
            .field("has_on_focus_gained", &self.on_focus_gained.is_some())
            .finish()
    }
}

/// Serializable coordinator settings.
///
/// Durations are in milliseconds. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PresenceSettings {
    pub maintain_always_on_top: bool,
    pub respect_system_interactions: bool,
    pub auto_hide_on_system_interaction: bool,
    pub focus_check_interval_ms: u64,
    pub interaction_timeout_ms: u64,
    pub enforcement_window_ms: u64,
    pub blur_debounce_ms: u64,
    pub visibility_grace_ms: u64,
    pub suspend_duration_ms: u64,
}

impl Default for PresenceSettings {
    fn default() -> Self {
        let timings = PresenceTimings::default();
        Self {
            maintain_always_on_top: true,
            respect_system_interactions: true,
            auto_hide_on_system_interaction: false,
            focus_check_interval_ms: millis(DEFAULT_FOCUS_CHECK_INTERVAL),
            interaction_timeout_ms: millis(timings.interaction_timeout),
            enforcement_window_ms: millis(timings.enforcement_window),
            blur_debounce_ms: millis(timings.blur_debounce),
            visibility_grace_ms: millis(timings.visibility_grace),
            suspend_duration_ms: millis(timings.suspend_duration),
        }
    }
}

impl PresenceSettings {
    /// Build a coordinator config without callbacks.
    ///
    /// A zero focus-check interval is bumped to 1 ms; tokio rejects a zero
    /// period.
    pub fn to_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            maintain_always_on_top: self.maintain_always_on_top,
            respect_system_interactions: self.respect_system_interactions,
            auto_hide_on_system_interaction: self.auto_hide_on_system_interaction,
            focus_check_interval: Duration::from_millis(self.focus_check_interval_ms.max(1)),
            timings: PresenceTimings {
                interaction_timeout: Duration::from_millis(self.interaction_timeout_ms),
                enforcement_window: Duration::from_millis(self.enforcement_window_ms),
                blur_debounce: Duration::from_millis(self.blur_debounce_ms),
                visibility_grace: Duration::from_millis(self.visibility_grace_ms),
                suspend_duration: Duration::from_millis(self.suspend_duration_ms),
            },
            on_focus_lost: None,
            on_focus_gained: None,
        }
    }
}

impl From<&CoordinatorConfig> for PresenceSettings {
    fn from(config: &CoordinatorConfig) -> Self {
        Self {
            maintain_always_on_top: config.maintain_always_on_top,
            respect_system_interactions: config.respect_system_interactions,
            auto_hide_on_system_interaction: config.auto_hide_on_system_interaction,
            focus_check_interval_ms: millis(config.focus_check_interval),
            interaction_timeout_ms: millis(config.timings.interaction_timeout),
            enforcement_window_ms: millis(config.timings.enforcement_window),
            blur_debounce_ms: millis(config.timings.blur_debounce),
            visibility_grace_ms: millis(config.timings.visibility_grace),
            suspend_duration_ms: millis(config.timings.suspend_duration),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings_match_tuned_values() {
        let timings = PresenceTimings::default();
        assert_eq!(timings.interaction_timeout, Duration::from_millis(3000));
        assert_eq!(timings.enforcement_window, Duration::from_millis(5000));
        assert_eq!(timings.blur_debounce, Duration::from_millis(500));
        assert_eq!(timings.visibility_grace, Duration::from_millis(1000));
        assert_eq!(timings.suspend_duration, Duration::from_millis(3000));
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let json = r#"{"autoHideOnSystemInteraction": true, "focusCheckIntervalMs": 750}"#;
        let settings: PresenceSettings = serde_json::from_str(json).unwrap();

        assert!(settings.auto_hide_on_system_interaction);
        assert!(settings.maintain_always_on_top);
        assert_eq!(settings.focus_check_interval_ms, 750);
        assert_eq!(settings.blur_debounce_ms, 500);
    }

    #[test]
    fn test_settings_to_config() {
        let settings = PresenceSettings {
            respect_system_interactions: false,
            enforcement_window_ms: 8000,
            ..Default::default()
        };
        let config = settings.to_config();

        assert!(!config.respect_system_interactions);
        assert_eq!(config.timings.enforcement_window, Duration::from_secs(8));
        assert_eq!(config.focus_check_interval, DEFAULT_FOCUS_CHECK_INTERVAL);
        assert!(config.on_focus_gained.is_none());
        assert_eq!(PresenceSettings::from(&config), settings);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let settings = PresenceSettings {
            focus_check_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(settings.to_config().focus_check_interval, Duration::from_millis(1));
    }
}
