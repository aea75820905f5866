//! Error types for window-control operations.

use thiserror::Error;

/// Errors reported by a [`WindowControl`](crate::WindowControl) implementation.
///
/// The coordinator treats all of these as transient: they are logged and the
/// next monitor tick tries again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// Reading window state (e.g. focus) failed.
    #[error("failed to query window state: {0}")]
    Query(String),

    /// A window command (always-on-top, focus, resize) failed.
    #[error("window command failed: {0}")]
    Command(String),

    /// The window is gone or not yet created.
    #[error("window unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, SurfaceError>;
