//! Interaction classification.
//!
//! Pure domain logic - no I/O, no platform dependencies. Raw input arrives
//! from the webview with the shape of the DOM events it came from.

use serde::{Deserialize, Serialize};

/// Modifier state and key name of a key-down event.
///
/// Field names follow `KeyboardEvent` so the webview can forward it as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyCombo {
    /// `KeyboardEvent.key` (e.g. "Tab", " ", "Delete").
    pub key: String,
    #[serde(default)]
    pub alt_key: bool,
    #[serde(default)]
    pub ctrl_key: bool,
    #[serde(default)]
    pub meta_key: bool,
    #[serde(default)]
    pub shift_key: bool,
}

impl KeyCombo {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn alt(mut self) -> Self {
        self.alt_key = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta_key = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift_key = true;
        self
    }
}

/// `document.visibilityState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

/// An input event as observed by the webview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RawInput {
    KeyDown(KeyCombo),
    VisibilityChanged { state: Visibility },
    Blur,
    Click,
    PointerMove,
}

/// What triggered a system interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SystemTrigger {
    /// Alt+Tab / Cmd+Tab.
    TabSwitch,
    /// Cmd+Space.
    Spotlight,
    /// Ctrl+Alt+Delete.
    TaskManager,
    /// The document became hidden.
    VisibilityHidden,
}

impl SystemTrigger {
    /// Whether the trigger is a keyboard shortcut, as opposed to a window
    /// state change.
    pub fn is_shortcut(&self) -> bool {
        !matches!(self, SystemTrigger::VisibilityHidden)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SystemTrigger::TabSwitch => "tab_switch",
            SystemTrigger::Spotlight => "spotlight",
            SystemTrigger::TaskManager => "task_manager",
            SystemTrigger::VisibilityHidden => "visibility_hidden",
        }
    }
}

impl std::fmt::Display for SystemTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A classified input occurrence. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InteractionEvent {
    UserInteraction,
    SystemInteraction { trigger: SystemTrigger },
}

/// Result of classifying one [`RawInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Interaction(InteractionEvent),
    /// The document became visible again; ends a `VisibilityHidden`
    /// interaction after the grace period.
    VisibilityRestored,
    /// The window lost focus. Handled by the blur debounce.
    Blur,
    Ignore,
}

/// Match a key combination against the system-shortcut set.
pub fn system_shortcut(combo: &KeyCombo) -> Option<SystemTrigger> {
    let key = combo.key.as_str();

    if key == "Tab" && (combo.alt_key || combo.meta_key) {
        return Some(SystemTrigger::TabSwitch);
    }
    if key == "Delete" && combo.ctrl_key && combo.alt_key {
        return Some(SystemTrigger::TaskManager);
    }
    if combo.meta_key && matches!(key, " " | "Spacebar") {
        return Some(SystemTrigger::Spotlight);
    }

    None
}

/// Classify a raw input event.
pub fn classify(input: &RawInput) -> Classification {
    match input {
        RawInput::KeyDown(combo) => {
            if combo.key.is_empty() || combo.key == "Unidentified" {
                return Classification::Ignore;
            }
            match system_shortcut(combo) {
                Some(trigger) => {
                    Classification::Interaction(InteractionEvent::SystemInteraction { trigger })
                }
                None => Classification::Interaction(InteractionEvent::UserInteraction),
            }
        }
        RawInput::VisibilityChanged {
            state: Visibility::Hidden,
        } => Classification::Interaction(InteractionEvent::SystemInteraction {
            trigger: SystemTrigger::VisibilityHidden,
        }),
        RawInput::VisibilityChanged {
            state: Visibility::Visible,
        } => Classification::VisibilityRestored,
        RawInput::Blur => Classification::Blur,
        RawInput::Click | RawInput::PointerMove => {
            Classification::Interaction(InteractionEvent::UserInteraction)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(trigger: SystemTrigger) -> Classification {
        Classification::Interaction(InteractionEvent::SystemInteraction { trigger })
    }

    const USER: Classification = Classification::Interaction(InteractionEvent::UserInteraction);

    #[test]
    fn test_tab_switch_shortcuts() {
        let alt_tab = RawInput::KeyDown(KeyCombo::new("Tab").alt());
        let cmd_tab = RawInput::KeyDown(KeyCombo::new("Tab").meta());
        let cmd_shift_tab = RawInput::KeyDown(KeyCombo::new("Tab").meta().shift());

        assert_eq!(classify(&alt_tab), system(SystemTrigger::TabSwitch));
        assert_eq!(classify(&cmd_tab), system(SystemTrigger::TabSwitch));
        assert_eq!(classify(&cmd_shift_tab), system(SystemTrigger::TabSwitch));
    }

    #[test]
    fn test_task_manager_requires_ctrl_and_alt() {
        let full = RawInput::KeyDown(KeyCombo::new("Delete").ctrl().alt());
        let ctrl_only = RawInput::KeyDown(KeyCombo::new("Delete").ctrl());

        assert_eq!(classify(&full), system(SystemTrigger::TaskManager));
        assert_eq!(classify(&ctrl_only), USER);
    }

    #[test]
    fn test_spotlight() {
        let cmd_space = RawInput::KeyDown(KeyCombo::new(" ").meta());
        let space = RawInput::KeyDown(KeyCombo::new(" "));

        assert_eq!(classify(&cmd_space), system(SystemTrigger::Spotlight));
        assert_eq!(classify(&space), USER);
    }

    #[test]
    fn test_plain_tab_is_user_interaction() {
        assert_eq!(classify(&RawInput::KeyDown(KeyCombo::new("Tab"))), USER);
        assert_eq!(classify(&RawInput::KeyDown(KeyCombo::new("Tab").ctrl())), USER);
    }

    #[test]
    fn test_visibility() {
        let hidden = RawInput::VisibilityChanged {
            state: Visibility::Hidden,
        };
        let visible = RawInput::VisibilityChanged {
            state: Visibility::Visible,
        };

        assert_eq!(classify(&hidden), system(SystemTrigger::VisibilityHidden));
        assert_eq!(classify(&visible), Classification::VisibilityRestored);
    }

    #[test]
    fn test_pointer_and_click() {
        assert_eq!(classify(&RawInput::Click), USER);
        assert_eq!(classify(&RawInput::PointerMove), USER);
        assert_eq!(classify(&RawInput::Blur), Classification::Blur);
    }

    #[test]
    fn test_unidentified_key_is_noise() {
        assert_eq!(
            classify(&RawInput::KeyDown(KeyCombo::new("Unidentified"))),
            Classification::Ignore
        );
        assert_eq!(classify(&RawInput::KeyDown(KeyCombo::new(""))), Classification::Ignore);
    }

    #[test]
    fn test_trigger_is_shortcut() {
        assert!(SystemTrigger::TabSwitch.is_shortcut());
        assert!(SystemTrigger::Spotlight.is_shortcut());
        assert!(SystemTrigger::TaskManager.is_shortcut());
        assert!(!SystemTrigger::VisibilityHidden.is_shortcut());
    }

    #[test]
    fn test_raw_input_from_webview_json() {
        let json = r#"{"type": "keyDown", "key": "Tab", "altKey": true}"#;
        let input: RawInput = serde_json::from_str(json).unwrap();
        assert_eq!(input, RawInput::KeyDown(KeyCombo::new("Tab").alt()));

        let json = r#"{"type": "visibilityChanged", "state": "hidden"}"#;
        let input: RawInput = serde_json::from_str(json).unwrap();
        assert_eq!(
            input,
            RawInput::VisibilityChanged {
                state: Visibility::Hidden
            }
        );

        let input: RawInput = serde_json::from_str(r#"{"type": "pointerMove"}"#).unwrap();
        assert_eq!(input, RawInput::PointerMove);
    }
}
