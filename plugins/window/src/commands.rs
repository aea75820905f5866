//! Window and presence commands exposed to the webview.

use crate::adapters::suspend_always_on_top;
use crate::error::Result;
use crate::position;
use crate::SharedState;
use perch_events::{event_names, WindowVisibilityEvent};
use perch_presence::{PresenceSettings, PresenceSnapshot};
use std::time::Duration;
use tauri::{command, AppHandle, Emitter, Runtime, State, WebviewWindow};

/// Resize the panel to `height` logical pixels and keep it top-centered.
#[command]
pub async fn set_window_height(state: State<'_, SharedState>, height: u32) -> Result<()> {
    crate::state::resize_panel(&state, height).await
}

/// Switch between the expanded panel and the collapsed input bar.
#[command]
pub async fn set_panel_expanded(state: State<'_, SharedState>, expanded: bool) -> Result<()> {
    crate::state::resize_panel(&state, position::panel_height(expanded)).await
}

#[command]
pub async fn set_always_on_top<R: Runtime>(
    window: WebviewWindow<R>,
    always_on_top: bool,
) -> Result<()> {
    window.set_always_on_top(always_on_top)?;
    Ok(())
}

/// Focus the window unconditionally.
#[command]
pub async fn bring_to_front<R: Runtime>(window: WebviewWindow<R>) -> Result<()> {
    window.set_focus()?;
    Ok(())
}

/// Focus the window. Unfocusing is not supported and does nothing.
#[command]
pub async fn set_window_focus<R: Runtime>(window: WebviewWindow<R>, focused: bool) -> Result<()> {
    if focused {
        window.set_focus()?;
    }
    Ok(())
}

#[command]
pub async fn temporary_disable_always_on_top<R: Runtime>(
    window: WebviewWindow<R>,
    duration_ms: u64,
) -> Result<()> {
    suspend_always_on_top(&window, Duration::from_millis(duration_ms))?;
    Ok(())
}

/// Hide the window if visible, otherwise show and focus it.
///
/// Returns the new visibility.
#[command]
pub async fn toggle_window_visibility<R: Runtime>(
    app: AppHandle<R>,
    window: WebviewWindow<R>,
) -> Result<bool> {
    let visible = !window.is_visible()?;
    if visible {
        window.show()?;
        window.set_focus()?;
    } else {
        window.hide()?;
    }

    app.emit(
        event_names::WINDOW_VISIBILITY_CHANGED,
        WindowVisibilityEvent { visible },
    )?;
    Ok(visible)
}

/// Bring the window forward, subject to the presence policy: pin unless the
/// OS is busy, raise only while the user is interacting.
#[command]
pub async fn presence_bring_to_front(state: State<'_, SharedState>) -> Result<()> {
    let guard = state.lock().await;
    guard.coordinator().bring_to_front().await;
    Ok(())
}

/// Current presence state, or `None` when the coordinator is stopped.
#[command]
pub async fn get_presence_state(
    state: State<'_, SharedState>,
) -> Result<Option<PresenceSnapshot>> {
    let guard = state.lock().await;
    Ok(guard.coordinator().snapshot())
}

#[command]
pub async fn get_presence_settings(state: State<'_, SharedState>) -> Result<PresenceSettings> {
    let guard = state.lock().await;
    Ok(guard.settings())
}

/// Replace the presence settings. Restarts the coordinator.
#[command]
pub async fn set_presence_settings(
    state: State<'_, SharedState>,
    settings: PresenceSettings,
) -> Result<PresenceSettings> {
    let mut guard = state.lock().await;
    guard.apply_settings(settings);
    Ok(guard.settings())
}

#[command]
pub async fn get_app_version<R: Runtime>(app: AppHandle<R>) -> String {
    app.package_info().version.to_string()
}
