fn main() {
    tauri_plugin::Builder::new(&[
        "set_window_height",
        "set_panel_expanded",
        "set_always_on_top",
        "bring_to_front",
        "set_window_focus",
        "temporary_disable_always_on_top",
        "toggle_window_visibility",
        "presence_bring_to_front",
        "get_presence_state",
        "get_presence_settings",
        "set_presence_settings",
        "get_app_version",
    ])
    .build();
}
