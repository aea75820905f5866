//! One started coordinator's state and pending timers.
//!
//! A session lives from `start` to `stop`. Every mutation goes through
//! [`Session::mutate`], which refuses to touch the state once the session's
//! cancellation token has fired. The token is cancelled while holding the
//! state lock, so nothing already in flight can mutate after `stop` returns.

use crate::config::CoordinatorConfig;
use crate::state::{PresenceSnapshot, PresenceState};
use crate::surface::WindowControlRef;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Deferred state changes that can be cancelled before they fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerSlot {
    /// Clears `user_interacting` after a blur.
    Blur,
    /// Lifts system suppression after the document became visible.
    VisibilityGrace,
}

struct PendingTimer {
    id: u64,
    handle: AbortHandle,
}

#[derive(Default)]
struct Timers {
    next_id: u64,
    blur: Option<PendingTimer>,
    visibility_grace: Option<PendingTimer>,
}

impl Timers {
    fn slot(&mut self, slot: TimerSlot) -> &mut Option<PendingTimer> {
        match slot {
            TimerSlot::Blur => &mut self.blur,
            TimerSlot::VisibilityGrace => &mut self.visibility_grace,
        }
    }

    fn cancel(&mut self, slot: TimerSlot) -> bool {
        match self.slot(slot).take() {
            Some(timer) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    fn cancel_all(&mut self) {
        self.cancel(TimerSlot::Blur);
        self.cancel(TimerSlot::VisibilityGrace);
    }
}

pub(crate) struct Inner {
    pub(crate) state: PresenceState,
    timers: Timers,
}

impl Inner {
    pub(crate) fn cancel_timer(&mut self, slot: TimerSlot) -> bool {
        self.timers.cancel(slot)
    }

    pub(crate) fn has_pending(&self, slot: TimerSlot) -> bool {
        match slot {
            TimerSlot::Blur => self.timers.blur.is_some(),
            TimerSlot::VisibilityGrace => self.timers.visibility_grace.is_some(),
        }
    }
}

pub(crate) struct Session {
    pub(crate) config: CoordinatorConfig,
    pub(crate) surface: WindowControlRef,
    pub(crate) runtime: Handle,
    token: CancellationToken,
    inner: Mutex<Inner>,
}

impl Session {
    pub(crate) fn new(config: CoordinatorConfig, surface: WindowControlRef, runtime: Handle) -> Self {
        Self {
            config,
            surface,
            runtime,
            token: CancellationToken::new(),
            inner: Mutex::new(Inner {
                state: PresenceState::new(Instant::now()),
                timers: Timers::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Run `f` against the state unless the session has been shut down.
    pub(crate) fn mutate<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> Option<R> {
        let mut inner = self.lock();
        if self.token.is_cancelled() {
            return None;
        }
        Some(f(&mut inner))
    }

    pub(crate) fn snapshot(&self) -> PresenceSnapshot {
        self.lock().state.snapshot(Instant::now())
    }

    /// Cancel the token and every pending timer.
    pub(crate) fn shutdown(&self) {
        let mut inner = self.lock();
        self.token.cancel();
        inner.timers.cancel_all();
    }

    /// Arm `slot` to run `action` after `delay`, replacing any pending timer
    /// in the same slot. Must be called with the state lock held (`inner`).
    pub(crate) fn schedule(
        self: &Arc<Self>,
        inner: &mut Inner,
        slot: TimerSlot,
        delay: Duration,
        action: fn(&mut PresenceState),
    ) {
        inner.timers.cancel(slot);

        let id = inner.timers.next_id;
        inner.timers.next_id += 1;

        // The deadline counts from the triggering event, not from when the
        // task is first polled.
        let deadline = Instant::now() + delay;
        let session = Arc::clone(self);
        let join = self.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            session.fire(slot, id, action);
        });

        *inner.timers.slot(slot) = Some(PendingTimer {
            id,
            handle: join.abort_handle(),
        });
    }

    fn fire(&self, slot: TimerSlot, id: u64, action: fn(&mut PresenceState)) {
        self.mutate(|inner| {
            let current = inner.timers.slot(slot).as_ref().map(|t| t.id);
            if current != Some(id) {
                return;
            }
            *inner.timers.slot(slot) = None;
            action(&mut inner.state);
            tracing::debug!(?slot, "presence timer fired");
        });
    }

    /// Spawn a window command that is dropped if the session stops first.
    pub(crate) fn spawn_command<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.token.clone();
        self.runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = future => {}
            }
        });
    }
}

/// Read-only handle on a coordinator session.
///
/// Stays valid after the session stops and then reports the state as it was
/// at shutdown.
#[derive(Clone)]
pub struct PresenceHandle {
    session: Arc<Session>,
}

impl PresenceHandle {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn snapshot(&self) -> PresenceSnapshot {
        self.session.snapshot()
    }

    /// False once the owning coordinator has stopped this session.
    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }
}

impl std::fmt::Debug for PresenceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceHandle")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}
