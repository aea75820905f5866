//! Tauri event bus adapter.

use perch_events::EventBus;
use tauri::{AppHandle, Emitter, Runtime};

/// EventBus implementation that emits events to every webview via Tauri.
pub struct TauriEventBus<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> TauriEventBus<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> EventBus for TauriEventBus<R> {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        if let Err(e) = self.app.emit(topic, payload) {
            tracing::warn!(topic, error = %e, "failed to emit event");
        }
    }
}
