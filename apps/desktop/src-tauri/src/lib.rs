use perch_events::{event_names, ShortcutPressedEvent};
use tauri::{AppHandle, Emitter, Runtime};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};
use tauri_plugin_perch_window::MAIN_WINDOW_LABEL;
use tracing_subscriber::EnvFilter;

/// Cmd+/ on macOS, Ctrl+/ elsewhere.
const TOGGLE_SHORTCUT: &str = "CommandOrControl+Slash";

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,perch=debug"))
        )
        .init();

    tracing::info!("Starting Perch desktop app");

    tauri::Builder::default()
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_perch_window::init())
        .setup(|app| {
            tauri_plugin_perch_window::setup_main_window(app.handle())?;
            register_toggle_shortcut(app.handle())?;
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

fn register_toggle_shortcut<R: Runtime>(
    app: &AppHandle<R>,
) -> Result<(), tauri_plugin_global_shortcut::Error> {
    app.global_shortcut()
        .on_shortcut(TOGGLE_SHORTCUT, |app, _shortcut, event| {
            if event.state != ShortcutState::Pressed {
                return;
            }
            let payload = ShortcutPressedEvent::now(TOGGLE_SHORTCUT);
            if let Err(e) = app.emit_to(MAIN_WINDOW_LABEL, event_names::SHORTCUT_PRESSED, payload) {
                tracing::warn!(error = %e, "failed to emit shortcut event");
            }
        })?;

    tracing::info!(shortcut = TOGGLE_SHORTCUT, "global shortcut registered");
    Ok(())
}
