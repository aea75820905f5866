//! Adapters that bridge Tauri to the presence crate's ports.

mod event_bus;
mod input;
mod window;

pub use event_bus::TauriEventBus;
pub use input::TauriInputSource;
pub use window::{suspend_always_on_top, TauriWindow};
