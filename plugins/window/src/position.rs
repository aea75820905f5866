//! Overlay placement: a fixed-width panel hanging from the top edge of the
//! screen, horizontally centered.

use crate::error::{Result, WindowError};
use tauri::{
    LogicalSize, Manager, PhysicalPosition, PhysicalSize, Position, Runtime, Size, WebviewWindow,
};

/// Label of the overlay window in `tauri.conf.json`.
pub const MAIN_WINDOW_LABEL: &str = "main";

/// Distance from the top of the monitor, in physical pixels.
pub const TOP_OFFSET: i32 = 54;

/// Panel width, in logical pixels.
pub const PANEL_WIDTH: f64 = 700.0;

/// Panel height when expanded, in logical pixels.
pub const EXPANDED_HEIGHT: u32 = 600;

/// Panel height when collapsed to the input bar, in logical pixels.
pub const COLLAPSED_HEIGHT: u32 = 54;

/// Panel height for the expanded or collapsed state.
pub fn panel_height(expanded: bool) -> u32 {
    if expanded {
        EXPANDED_HEIGHT
    } else {
        COLLAPSED_HEIGHT
    }
}

/// Resolve the overlay window: `main`, else whichever window exists.
pub fn main_window<R: Runtime, M: Manager<R>>(manager: &M) -> Option<WebviewWindow<R>> {
    manager
        .get_webview_window(MAIN_WINDOW_LABEL)
        .or_else(|| manager.webview_windows().into_values().next())
}

/// Position of a window of `window_size` centered on a monitor, `y_offset`
/// below its top edge.
pub fn top_center(
    monitor_origin: PhysicalPosition<i32>,
    monitor_size: PhysicalSize<u32>,
    window_size: PhysicalSize<u32>,
    y_offset: i32,
) -> PhysicalPosition<i32> {
    let free = i64::from(monitor_size.width) - i64::from(window_size.width);
    let x = i64::from(monitor_origin.x) + free / 2;

    PhysicalPosition {
        x: i32::try_from(x).unwrap_or(monitor_origin.x),
        y: monitor_origin.y.saturating_add(y_offset),
    }
}

/// Move `window` to the top center of its monitor.
pub fn position_top_center<R: Runtime>(window: &WebviewWindow<R>, y_offset: i32) -> Result<()> {
    let monitor = match window.current_monitor()? {
        Some(monitor) => monitor,
        None => window.primary_monitor()?.ok_or(WindowError::MonitorNotFound)?,
    };

    let position = top_center(
        *monitor.position(),
        *monitor.size(),
        window.outer_size()?,
        y_offset,
    );
    window.set_position(Position::Physical(position))?;

    tracing::debug!(x = position.x, y = position.y, "window positioned");
    Ok(())
}

/// Resize the panel to `height` at the fixed panel width and re-center it.
///
/// Repositioning failures are logged; the resize itself already happened.
pub fn resize_panel<R: Runtime>(window: &WebviewWindow<R>, height: u32) -> Result<()> {
    window.set_size(Size::Logical(LogicalSize::new(PANEL_WIDTH, f64::from(height))))?;

    if let Err(e) = position_top_center(window, TOP_OFFSET) {
        tracing::warn!(error = %e, "failed to reposition window");
    }
    Ok(())
}

/// Initial placement of the overlay: top center, pinned, focused.
pub fn setup_main_window<R: Runtime, M: Manager<R>>(manager: &M) -> Result<()> {
    let window = main_window(manager).ok_or(WindowError::WindowNotFound)?;

    position_top_center(&window, TOP_OFFSET)?;
    window.set_always_on_top(true)?;
    window.set_focus()?;

    tracing::info!(label = window.label(), "main window ready");
    Ok(())
}
