//! Window control surface.
//!
//! The coordinator only talks to the window through [`WindowControl`]. The
//! Tauri plugin provides the real implementation; [`NullWindow`] and
//! [`RecordingWindow`] cover headless use and tests.

use crate::error::{Result, SurfaceError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Platform window operations consumed by the coordinator.
#[async_trait]
pub trait WindowControl: Send + Sync {
    /// Whether the window currently has keyboard focus.
    async fn is_focused(&self) -> Result<bool>;

    async fn set_always_on_top(&self, always_on_top: bool) -> Result<()>;

    /// Raise the window above its siblings.
    async fn bring_to_front(&self) -> Result<()>;

    /// Request (or release) keyboard focus.
    async fn set_focus(&self, focused: bool) -> Result<()>;

    /// Drop always-on-top now and restore it once `duration` has elapsed.
    async fn suspend_always_on_top(&self, duration: Duration) -> Result<()>;

    /// Change the window height, in logical pixels.
    async fn resize(&self, height: u32) -> Result<()>;
}

/// Type alias for a shared window control.
pub type WindowControlRef = Arc<dyn WindowControl>;

/// No-op implementation for headless runs. Never focused.
pub struct NullWindow;

#[async_trait]
impl WindowControl for NullWindow {
    async fn is_focused(&self) -> Result<bool> {
        Ok(false)
    }

    async fn set_always_on_top(&self, _always_on_top: bool) -> Result<()> {
        Ok(())
    }

    async fn bring_to_front(&self) -> Result<()> {
        Ok(())
    }

    async fn set_focus(&self, _focused: bool) -> Result<()> {
        Ok(())
    }

    async fn suspend_always_on_top(&self, _duration: Duration) -> Result<()> {
        Ok(())
    }

    async fn resize(&self, _height: u32) -> Result<()> {
        Ok(())
    }
}

/// A command issued against a [`RecordingWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    SetAlwaysOnTop(bool),
    BringToFront,
    SetFocus(bool),
    SuspendAlwaysOnTop(Duration),
    Resize(u32),
}

/// In-memory window for testing.
///
/// Captures every command and answers focus queries from a settable value.
/// Failures can be injected per call.
#[derive(Default)]
pub struct RecordingWindow {
    focused: AtomicBool,
    fail_all: AtomicBool,
    queued_focus_errors: Mutex<VecDeque<SurfaceError>>,
    commands: Mutex<Vec<WindowCommand>>,
    focus_queries: Mutex<usize>,
}

impl RecordingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value returned by `is_focused`.
    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::SeqCst);
    }

    /// Make every call fail until turned off again.
    pub fn set_failing(&self, failing: bool) {
        self.fail_all.store(failing, Ordering::SeqCst);
    }

    /// Make the next focus query fail with `error`.
    pub fn fail_next_focus_query(&self, error: SurfaceError) {
        lock(&self.queued_focus_errors).push_back(error);
    }

    /// Get all captured commands.
    pub fn commands(&self) -> Vec<WindowCommand> {
        lock(&self.commands).clone()
    }

    /// Count captured commands matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&WindowCommand) -> bool) -> usize {
        lock(&self.commands).iter().filter(|c| predicate(c)).count()
    }

    /// Number of `is_focused` calls, successful or not.
    pub fn focus_queries(&self) -> usize {
        *lock(&self.focus_queries)
    }

    /// Clear all captured commands.
    pub fn clear(&self) {
        lock(&self.commands).clear();
    }

    fn record(&self, command: WindowCommand) -> Result<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(SurfaceError::Command(format!("{:?} rejected", command)));
        }
        lock(&self.commands).push(command);
        Ok(())
    }
}

#[async_trait]
impl WindowControl for RecordingWindow {
    async fn is_focused(&self) -> Result<bool> {
        *lock(&self.focus_queries) += 1;
        if let Some(error) = lock(&self.queued_focus_errors).pop_front() {
            return Err(error);
        }
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(SurfaceError::Query("focus query rejected".to_string()));
        }
        Ok(self.focused.load(Ordering::SeqCst))
    }

    async fn set_always_on_top(&self, always_on_top: bool) -> Result<()> {
        self.record(WindowCommand::SetAlwaysOnTop(always_on_top))
    }

    async fn bring_to_front(&self) -> Result<()> {
        self.record(WindowCommand::BringToFront)
    }

    async fn set_focus(&self, focused: bool) -> Result<()> {
        self.record(WindowCommand::SetFocus(focused))
    }

    async fn suspend_always_on_top(&self, duration: Duration) -> Result<()> {
        self.record(WindowCommand::SuspendAlwaysOnTop(duration))
    }

    async fn resize(&self, height: u32) -> Result<()> {
        self.record(WindowCommand::Resize(height))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_window_captures_commands() {
        let window = RecordingWindow::new();

        window.set_always_on_top(true).await.unwrap();
        window.bring_to_front().await.unwrap();
        window
            .suspend_always_on_top(Duration::from_secs(3))
            .await
            .unwrap();

        assert_eq!(
            window.commands(),
            vec![
                WindowCommand::SetAlwaysOnTop(true),
                WindowCommand::BringToFront,
                WindowCommand::SuspendAlwaysOnTop(Duration::from_secs(3)),
            ]
        );
        assert_eq!(window.count(|c| *c == WindowCommand::BringToFront), 1);
    }

    #[tokio::test]
    async fn test_recording_window_failures() {
        let window = RecordingWindow::new();
        window.set_focused(true);
        window.fail_next_focus_query(SurfaceError::Query("hiccup".to_string()));

        assert!(window.is_focused().await.is_err());
        assert!(window.is_focused().await.unwrap());
        assert_eq!(window.focus_queries(), 2);

        window.set_failing(true);
        assert!(window.set_focus(true).await.is_err());
        assert!(window.commands().is_empty());
    }

    #[tokio::test]
    async fn test_null_window() {
        let window = NullWindow;
        assert!(!window.is_focused().await.unwrap());
        assert!(window.resize(600).await.is_ok());
    }
}
