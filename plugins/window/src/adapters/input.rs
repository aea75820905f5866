//! `InputSource` over Tauri events.
//!
//! The webview emits DOM-derived input on the `presence:*` topics with a
//! JSON `RawInput` payload.

use perch_presence::{InputHandler, InputSource, ListenerId, RawInput};
use tauri::{AppHandle, EventId, Listener, Runtime};

pub struct TauriInputSource<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> TauriInputSource<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

/// Decode a webview input payload. Malformed payloads are logged and dropped.
pub fn parse_input(topic: &str, payload: &str) -> Option<RawInput> {
    match serde_json::from_str(payload) {
        Ok(input) => Some(input),
        Err(e) => {
            tracing::warn!(topic, error = %e, "dropping malformed input payload");
            None
        }
    }
}

impl<R: Runtime> InputSource for TauriInputSource<R> {
    fn listen(&self, topic: &'static str, handler: InputHandler) -> ListenerId {
        let id = self.app.listen_any(topic, move |event| {
            if let Some(input) = parse_input(topic, event.payload()) {
                handler(input);
            }
        });
        ListenerId(u64::from(id))
    }

    fn unlisten(&self, id: ListenerId) {
        match EventId::try_from(id.0) {
            Ok(event_id) => self.app.unlisten(event_id),
            Err(_) => tracing::warn!(id = id.0, "unknown listener id"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_presence::{KeyCombo, Visibility};

    #[test]
    fn test_parse_keydown() {
        let payload = r#"{"type":"keyDown","key":"Tab","altKey":true}"#;
        assert_eq!(
            parse_input("presence:keydown", payload),
            Some(RawInput::KeyDown(KeyCombo::new("Tab").alt()))
        );
    }

    #[test]
    fn test_parse_visibility() {
        let payload = r#"{"type":"visibilityChanged","state":"hidden"}"#;
        assert_eq!(
            parse_input("presence:visibility", payload),
            Some(RawInput::VisibilityChanged {
                state: Visibility::Hidden
            })
        );
    }

    #[test]
    fn test_parse_unit_variants() {
        assert_eq!(parse_input("presence:blur", r#"{"type":"blur"}"#), Some(RawInput::Blur));
        assert_eq!(
            parse_input("presence:interaction", r#"{"type":"pointerMove"}"#),
            Some(RawInput::PointerMove)
        );
    }

    #[test]
    fn test_parse_malformed_is_dropped() {
        assert_eq!(parse_input("presence:keydown", "not json"), None);
        assert_eq!(parse_input("presence:keydown", r#"{"type":"scroll"}"#), None);
        assert_eq!(parse_input("presence:keydown", "null"), None);
    }
}
