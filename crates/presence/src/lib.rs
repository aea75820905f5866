//! Window presence for the Perch overlay.
//!
//! Decides, continuously, whether the overlay window should be pinned above
//! other windows, raised to the foreground, or left alone while the user or
//! the OS is doing something else.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  classifier.rs - raw input -> user/system interaction (pure)│
//! │  state.rs      - PresenceState and its transitions (pure)   │
//! │  config.rs     - CoordinatorConfig, PresenceSettings        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Ports                                 │
//! │  surface.rs - WindowControl trait (+ Null/Recording impls)  │
//! │  input.rs   - InputSource trait (+ InMemory impl)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Application Layer                          │
//! │  session.rs     - per-start state, timers, cancellation     │
//! │  monitor.rs     - periodic focus check and enforcement      │
//! │  coordinator.rs - start/stop, listener wiring               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use perch_presence::{CoordinatorConfig, InMemoryInputSource, NullWindow, PresenceCoordinator};
//! use std::sync::Arc;
//!
//! let mut coordinator = PresenceCoordinator::new(
//!     Arc::new(NullWindow),
//!     Arc::new(InMemoryInputSource::new()),
//!     tokio::runtime::Handle::current(),
//! );
//!
//! coordinator.start(CoordinatorConfig::default().with_on_focus_gained(|| {
//!     println!("overlay focused");
//! }));
//! ```

mod classifier;
mod config;
mod coordinator;
mod error;
mod input;
mod monitor;
mod session;
mod state;
mod surface;

pub use classifier::{
    classify, system_shortcut, Classification, InteractionEvent, KeyCombo, RawInput,
    SystemTrigger, Visibility,
};
pub use config::{
    CoordinatorConfig, FocusCallback, PresenceSettings, PresenceTimings,
    DEFAULT_BLUR_DEBOUNCE, DEFAULT_ENFORCEMENT_WINDOW, DEFAULT_FOCUS_CHECK_INTERVAL,
    DEFAULT_INTERACTION_TIMEOUT, DEFAULT_SUSPEND_DURATION, DEFAULT_VISIBILITY_GRACE,
};
pub use coordinator::PresenceCoordinator;
pub use error::{Result, SurfaceError};
pub use input::{topics, InMemoryInputSource, InputHandler, InputSource, InputSourceRef, ListenerId};
pub use session::PresenceHandle;
pub use state::{FocusTransition, PresenceSnapshot, PresenceState};
pub use surface::{NullWindow, RecordingWindow, WindowCommand, WindowControl, WindowControlRef};
