//! `WindowControl` over the overlay's `WebviewWindow`.
//!
//! The window is looked up on every call: plugin setup runs before the
//! configured windows exist, and the window may be recreated later.

use crate::position;
use async_trait::async_trait;
use perch_presence::{SurfaceError, WindowControl};
use std::time::Duration;
use tauri::{AppHandle, Runtime, WebviewWindow};

pub struct TauriWindow<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> TauriWindow<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }

    fn window(&self) -> perch_presence::Result<WebviewWindow<R>> {
        position::main_window(&self.app)
            .ok_or_else(|| SurfaceError::Unavailable(position::MAIN_WINDOW_LABEL.to_string()))
    }
}

fn command_error(e: impl std::fmt::Display) -> SurfaceError {
    SurfaceError::Command(e.to_string())
}

/// Drop always-on-top now and restore it after `duration`.
///
/// The restore runs detached so it still happens if the caller goes away.
pub fn suspend_always_on_top<R: Runtime>(
    window: &WebviewWindow<R>,
    duration: Duration,
) -> tauri::Result<()> {
    window.set_always_on_top(false)?;

    let window = window.clone();
    tauri::async_runtime::spawn(async move {
        tokio::time::sleep(duration).await;
        if let Err(e) = window.set_always_on_top(true) {
            tracing::warn!(error = %e, "failed to restore always on top");
        }
    });

    Ok(())
}

#[async_trait]
impl<R: Runtime> WindowControl for TauriWindow<R> {
    async fn is_focused(&self) -> perch_presence::Result<bool> {
        self.window()?
            .is_focused()
            .map_err(|e| SurfaceError::Query(e.to_string()))
    }

    async fn set_always_on_top(&self, always_on_top: bool) -> perch_presence::Result<()> {
        self.window()?
            .set_always_on_top(always_on_top)
            .map_err(command_error)
    }

    async fn bring_to_front(&self) -> perch_presence::Result<()> {
        let window = self.window()?;
        if window.is_minimized().unwrap_or(false) {
            window.unminimize().map_err(command_error)?;
        }
        window.show().map_err(command_error)
    }

    async fn set_focus(&self, focused: bool) -> perch_presence::Result<()> {
        // Tauri cannot give focus away; releasing is a no-op.
        if !focused {
            return Ok(());
        }
        self.window()?.set_focus().map_err(command_error)
    }

    async fn suspend_always_on_top(&self, duration: Duration) -> perch_presence::Result<()> {
        suspend_always_on_top(&self.window()?, duration).map_err(command_error)
    }

    async fn resize(&self, height: u32) -> perch_presence::Result<()> {
        position::resize_panel(&self.window()?, height).map_err(command_error)
    }
}
