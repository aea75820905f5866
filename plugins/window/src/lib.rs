//! Overlay window plugin for Perch.
//!
//! Owns the presence coordinator for the app's lifetime and exposes the
//! window commands to the webview.
//!
//! Configure it under `plugins.perch-window` in `tauri.conf.json`; every
//! field of [`PresenceSettings`] is optional:
//!
//! ```json
//! { "plugins": { "perch-window": { "autoHideOnSystemInteraction": true } } }
//! ```

use std::sync::Arc;

use perch_events::EventBusRef;
use perch_presence::{InputSourceRef, PresenceCoordinator, PresenceSettings, WindowControlRef};
use tauri::plugin::{Builder, TauriPlugin};
use tauri::{AppHandle, Manager, RunEvent, Runtime};
use tokio::sync::Mutex;

mod adapters;
mod commands;
mod error;
mod position;
mod state;

pub use adapters::{TauriEventBus, TauriInputSource, TauriWindow};
pub use error::{Result, WindowError};
pub use position::{
    main_window, panel_height, position_top_center, setup_main_window, COLLAPSED_HEIGHT,
    EXPANDED_HEIGHT, MAIN_WINDOW_LABEL, PANEL_WIDTH, TOP_OFFSET,
};
pub use state::State;

const PLUGIN_NAME: &str = "perch-window";

pub type SharedState = Mutex<State>;

pub fn init<R: Runtime>() -> TauriPlugin<R, Option<PresenceSettings>> {
    Builder::<R, Option<PresenceSettings>>::new(PLUGIN_NAME)
        .invoke_handler(tauri::generate_handler![
            commands::set_window_height,
            commands::set_panel_expanded,
            commands::set_always_on_top,
            commands::bring_to_front,
            commands::set_window_focus,
            commands::temporary_disable_always_on_top,
            commands::toggle_window_visibility,
            commands::presence_bring_to_front,
            commands::get_presence_state,
            commands::get_presence_settings,
            commands::set_presence_settings,
            commands::get_app_version,
        ])
        .setup(|app, api| {
            let settings = api.config().unwrap_or_default();
            start_presence(app, settings);
            Ok(())
        })
        .on_event(|app, event| {
            if let RunEvent::Exit = event {
                stop_presence(app);
            }
        })
        .build()
}

fn start_presence<R: Runtime>(app: &AppHandle<R>, settings: PresenceSettings) {
    let surface: WindowControlRef = Arc::new(TauriWindow::new(app.clone()));
    let input: InputSourceRef = Arc::new(TauriInputSource::new(app.clone()));
    let event_bus: EventBusRef = Arc::new(TauriEventBus::new(app.clone()));

    // Tauri callbacks run outside the runtime context, so the coordinator
    // gets the handle explicitly.
    let runtime = tauri::async_runtime::handle().inner().clone();
    let coordinator = PresenceCoordinator::new(Arc::clone(&surface), input, runtime);

    app.manage(SharedState::new(State::new(
        surface,
        coordinator,
        settings,
        event_bus,
    )));
    tracing::info!("Presence coordinator started");
}

fn stop_presence<R: Runtime>(app: &AppHandle<R>) {
    let Some(state) = app.try_state::<SharedState>() else {
        return;
    };
    match state.try_lock() {
        Ok(mut guard) => guard.shutdown(),
        Err(_) => tracing::warn!("presence state busy at exit, coordinator not stopped"),
    }
}
