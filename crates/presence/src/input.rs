//! Input source abstraction.
//!
//! The coordinator subscribes to raw input through [`InputSource`] so it can
//! run without a webview. In the app, the Tauri plugin maps topics onto
//! Tauri event listeners fed by the webview.

use crate::classifier::RawInput;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Input topics the coordinator subscribes to.
pub mod topics {
    /// Capturing key-down listener.
    pub const KEY_DOWN: &str = "presence:keydown";
    /// `visibilitychange` on the document.
    pub const VISIBILITY: &str = "presence:visibility";
    /// `blur` on the window.
    pub const BLUR: &str = "presence:blur";
    /// Clicks and pointer movement.
    pub const INTERACTION: &str = "presence:interaction";

    pub const ALL: [&str; 4] = [KEY_DOWN, VISIBILITY, BLUR, INTERACTION];
}

/// Handler invoked for each raw input on a topic.
pub type InputHandler = Arc<dyn Fn(RawInput) + Send + Sync + 'static>;

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// A registry of input listeners.
///
/// Every `listen` must be paired with exactly one `unlisten`.
pub trait InputSource: Send + Sync {
    fn listen(&self, topic: &'static str, handler: InputHandler) -> ListenerId;

    /// Remove a listener. Unknown ids are ignored.
    fn unlisten(&self, id: ListenerId);
}

/// Type alias for a shared input source.
pub type InputSourceRef = Arc<dyn InputSource>;

struct Listener {
    id: ListenerId,
    topic: &'static str,
    handler: InputHandler,
}

/// In-memory input source for testing and headless use.
#[derive(Default)]
pub struct InMemoryInputSource {
    next_id: AtomicU64,
    listeners: Mutex<Vec<Listener>>,
}

impl InMemoryInputSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `input` to every listener on `topic`.
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, topic: &str, input: RawInput) -> usize {
        let handlers = self.handlers_for(topic);
        for handler in &handlers {
            handler(input.clone());
        }
        handlers.len()
    }

    /// Handlers currently registered on `topic`.
    ///
    /// Holding on to these after `unlisten` simulates a callback that was
    /// already queued when its listener was removed.
    pub fn handlers_for(&self, topic: &str) -> Vec<InputHandler> {
        self.lock()
            .iter()
            .filter(|l| l.topic == topic)
            .map(|l| Arc::clone(&l.handler))
            .collect()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    pub fn listener_count_for(&self, topic: &str) -> usize {
        self.lock().iter().filter(|l| l.topic == topic).count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Listener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl InputSource for InMemoryInputSource {
    fn listen(&self, topic: &'static str, handler: InputHandler) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.lock().push(Listener { id, topic, handler });
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.lock().retain(|l| l.id != id);
    }
}
