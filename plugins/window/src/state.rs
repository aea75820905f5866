use crate::error::Result;
use crate::SharedState;
use perch_events::{emit_event, EventBusRef, FocusChangedEvent};
use perch_presence::{CoordinatorConfig, PresenceCoordinator, PresenceSettings, WindowControlRef};
use std::sync::Arc;

pub struct State {
    pub(crate) coordinator: PresenceCoordinator,
    pub(crate) surface: WindowControlRef,
    pub(crate) settings: PresenceSettings,
    pub(crate) event_bus: EventBusRef,
}

impl State {
    /// Start the coordinator with `settings`.
    ///
    /// `surface` is the window the coordinator controls; commands reuse it.
    pub fn new(
        surface: WindowControlRef,
        mut coordinator: PresenceCoordinator,
        settings: PresenceSettings,
        event_bus: EventBusRef,
    ) -> Self {
        coordinator.start(coordinator_config(&settings, &event_bus));
        Self {
            coordinator,
            surface,
            settings,
            event_bus,
        }
    }

    /// Replace the settings and restart the coordinator with them.
    pub fn apply_settings(&mut self, settings: PresenceSettings) {
        tracing::info!(?settings, "applying presence settings");
        self.settings = settings;
        self.coordinator
            .start(coordinator_config(&self.settings, &self.event_bus));
    }

    pub fn settings(&self) -> PresenceSettings {
        self.settings
    }

    pub fn surface(&self) -> WindowControlRef {
        Arc::clone(&self.surface)
    }

    pub fn coordinator(&self) -> &PresenceCoordinator {
        &self.coordinator
    }

    pub fn shutdown(&mut self) {
        self.coordinator.stop();
    }
}

/// Resize the panel through the window surface.
///
/// The state lock is released before the window call.
pub async fn resize_panel(shared: &SharedState, height: u32) -> Result<()> {
    let surface = shared.lock().await.surface();
    surface.resize(height).await?;
    Ok(())
}

/// Coordinator config whose focus callbacks emit `FocusChangedEvent`s.
pub fn coordinator_config(settings: &PresenceSettings, event_bus: &EventBusRef) -> CoordinatorConfig {
    let gained = Arc::clone(event_bus);
    let lost = Arc::clone(event_bus);

    settings
        .to_config()
        .with_on_focus_gained(move || emit_focus(&gained, true))
        .with_on_focus_lost(move || emit_focus(&lost, false))
}

fn emit_focus(event_bus: &EventBusRef, focused: bool) {
    let event = FocusChangedEvent::now(focused);
    emit_event(event_bus.as_ref(), event.topic(), &event);
}
