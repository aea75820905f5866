//! Shared event contracts between the Perch backend and the webview.
//!
//! Outgoing events are emitted by the window plugin and the desktop app.
//! Incoming input topics belong to `perch_presence::topics`.
//!
//! Also provides the `EventBus` trait for decoupled event emission.

mod bus;

pub use bus::{emit_event, EmittedEvent, EventBus, EventBusRef, InMemoryEventBus};

use serde::{Deserialize, Serialize};

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Event emitted when the overlay window gains or loses focus.
///
/// Producers: window plugin (focus monitor callbacks)
/// Consumers: frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusChangedEvent {
    pub focused: bool,
    /// Timestamp in milliseconds since epoch.
    #[serde(default)]
    pub timestamp_ms: i64,
}

impl FocusChangedEvent {
    pub fn now(focused: bool) -> Self {
        Self {
            focused,
            timestamp_ms: now_ms(),
        }
    }

    /// Event name matching this payload.
    pub fn topic(&self) -> &'static str {
        if self.focused {
            event_names::PRESENCE_FOCUS_GAINED
        } else {
            event_names::PRESENCE_FOCUS_LOST
        }
    }
}

/// Event emitted when the global shortcut fires.
///
/// Producers: desktop app (global shortcut handler)
/// Consumers: frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutPressedEvent {
    /// Accelerator string, e.g. "CommandOrControl+Slash".
    pub shortcut: String,
    #[serde(default)]
    pub timestamp_ms: i64,
}

impl ShortcutPressedEvent {
    pub fn now(shortcut: impl Into<String>) -> Self {
        Self {
            shortcut: shortcut.into(),
            timestamp_ms: now_ms(),
        }
    }
}

/// Event emitted after `toggle_window_visibility`.
///
/// Producers: window plugin (commands)
/// Consumers: frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowVisibilityEvent {
    pub visible: bool,
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// Overlay window gained focus.
    pub const PRESENCE_FOCUS_GAINED: &str = "presence:focus_gained";
    /// Overlay window lost focus.
    pub const PRESENCE_FOCUS_LOST: &str = "presence:focus_lost";
    /// Global shortcut pressed.
    pub const SHORTCUT_PRESSED: &str = "shortcut:pressed";
    /// Window shown or hidden by command.
    pub const WINDOW_VISIBILITY_CHANGED: &str = "window:visibility_changed";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_changed_topic() {
        assert_eq!(
            FocusChangedEvent::now(true).topic(),
            event_names::PRESENCE_FOCUS_GAINED
        );
        assert_eq!(
            FocusChangedEvent::now(false).topic(),
            event_names::PRESENCE_FOCUS_LOST
        );
    }

    #[test]
    fn test_focus_changed_serializes_camel_case() {
        let event = FocusChangedEvent {
            focused: true,
            timestamp_ms: 42,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["timestampMs"], 42);
        assert_eq!(json["focused"], true);
    }

    #[test]
    fn test_shortcut_pressed_deserialize_minimal() {
        let json = r#"{"shortcut": "CommandOrControl+Slash"}"#;
        let event: ShortcutPressedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.shortcut, "CommandOrControl+Slash");
        assert_eq!(event.timestamp_ms, 0);
    }
}
