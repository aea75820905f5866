//! Presence coordinator - lifecycle and input wiring.

use crate::classifier::{classify, Classification, InteractionEvent, RawInput, SystemTrigger};
use crate::config::CoordinatorConfig;
use crate::input::{topics, InputHandler, InputSourceRef, ListenerId};
use crate::monitor;
use crate::session::{PresenceHandle, Session, TimerSlot};
use crate::state::PresenceSnapshot;
use crate::surface::WindowControlRef;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

struct ActiveSession {
    session: Arc<Session>,
    monitor: JoinHandle<()>,
    listeners: Vec<ListenerId>,
}

/// Keeps the overlay window pinned while the user works with it, and out of
/// the way while the OS or another app needs the foreground.
///
/// Owns at most one session at a time. All spawned work runs on the tokio
/// runtime passed to [`PresenceCoordinator::new`].
pub struct PresenceCoordinator {
    surface: WindowControlRef,
    input: InputSourceRef,
    runtime: Handle,
    active: Option<ActiveSession>,
}

impl PresenceCoordinator {
    pub fn new(surface: WindowControlRef, input: InputSourceRef, runtime: Handle) -> Self {
        Self {
            surface,
            input,
            runtime,
            active: None,
        }
    }

    /// Start a new session with `config`.
    ///
    /// Registers the input listeners, makes an initial bring-to-front attempt
    /// when `maintain_always_on_top` is set, then starts the focus monitor.
    /// A running session is stopped first.
    pub fn start(&mut self, config: CoordinatorConfig) {
        if self.active.is_some() {
            tracing::warn!("PresenceCoordinator already running, restarting");
            self.stop();
        }

        tracing::info!(?config, "PresenceCoordinator starting");

        let session = Arc::new(Session::new(
            config,
            Arc::clone(&self.surface),
            self.runtime.clone(),
        ));

        let handler: InputHandler = {
            let session = Arc::clone(&session);
            Arc::new(move |input| handle_input(&session, input))
        };
        let listeners = topics::ALL
            .into_iter()
            .map(|topic| self.input.listen(topic, Arc::clone(&handler)))
            .collect();

        if session.config.maintain_always_on_top {
            let initial = Arc::clone(&session);
            session.spawn_command(async move { bring_to_front(&initial).await });
        }

        let monitor = monitor::spawn(Arc::clone(&session));

        self.active = Some(ActiveSession {
            session,
            monitor,
            listeners,
        });
    }

    /// Stop the current session.
    ///
    /// Cancels the monitor and pending timers and removes every listener
    /// added by `start`. No-op when not running.
    pub fn stop(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        active.session.shutdown();
        active.monitor.abort();
        for id in active.listeners {
            self.input.unlisten(id);
        }

        tracing::info!("PresenceCoordinator stopped");
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Configuration of the running session.
    pub fn config(&self) -> Option<&CoordinatorConfig> {
        self.active.as_ref().map(|a| &a.session.config)
    }

    pub fn handle(&self) -> Option<PresenceHandle> {
        self.active
            .as_ref()
            .map(|a| PresenceHandle::new(Arc::clone(&a.session)))
    }

    pub fn snapshot(&self) -> Option<PresenceSnapshot> {
        self.active.as_ref().map(|a| a.session.snapshot())
    }

    /// Feed one raw input event, as the registered listeners do.
    pub fn handle_input(&self, input: RawInput) {
        if let Some(active) = &self.active {
            handle_input(&active.session, input);
        }
    }

    /// Re-assert always-on-top and, only if the user is interacting, raise
    /// and focus the window.
    pub async fn bring_to_front(&self) {
        if let Some(session) = self.session() {
            bring_to_front(&session).await;
        }
    }

    /// Run one focus-monitor tick now.
    pub async fn check_window_focus(&self) {
        if let Some(session) = self.session() {
            monitor::tick(&session).await;
        }
    }

    fn session(&self) -> Option<Arc<Session>> {
        self.active.as_ref().map(|a| Arc::clone(&a.session))
    }
}

impl Drop for PresenceCoordinator {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for PresenceCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceCoordinator")
            .field("running", &self.is_running())
            .field("listeners", &self.active.as_ref().map_or(0, |a| a.listeners.len()))
            .finish_non_exhaustive()
    }
}

fn handle_input(session: &Arc<Session>, input: RawInput) {
    match classify(&input) {
        Classification::Ignore => {
            tracing::trace!(?input, "input ignored");
        }
        Classification::Interaction(InteractionEvent::UserInteraction) => {
            on_user_interaction(session);
        }
        Classification::Interaction(InteractionEvent::SystemInteraction { trigger }) => {
            if trigger.is_shortcut() && !session.config.respect_system_interactions {
                on_user_interaction(session);
            } else {
                on_system_interaction(session, trigger);
            }
        }
        Classification::VisibilityRestored => on_visibility_restored(session),
        Classification::Blur => on_blur(session),
    }
}

fn on_user_interaction(session: &Arc<Session>) {
    session.mutate(|inner| {
        inner.state.record_user_interaction(Instant::now());
        inner.cancel_timer(TimerSlot::Blur);
        inner.cancel_timer(TimerSlot::VisibilityGrace);
    });
}

fn on_system_interaction(session: &Arc<Session>, trigger: SystemTrigger) {
    let applied = session.mutate(|inner| {
        inner.state.enter_system_interaction();
        inner.cancel_timer(TimerSlot::Blur);
        inner.cancel_timer(TimerSlot::VisibilityGrace);
    });
    if applied.is_none() {
        return;
    }

    tracing::debug!(%trigger, "system interaction detected");

    if session.config.auto_hide_on_system_interaction {
        let duration = session.config.timings.suspend_duration;
        let surface = Arc::clone(&session.surface);
        session.spawn_command(async move {
            if let Err(e) = surface.suspend_always_on_top(duration).await {
                tracing::warn!(error = %e, "failed to suspend always on top");
            }
        });
    }
}

fn on_visibility_restored(session: &Arc<Session>) {
    let grace = session.config.timings.visibility_grace;
    session.mutate(|inner| {
        if inner.state.system_interaction_active {
            session.schedule(inner, TimerSlot::VisibilityGrace, grace, |state| {
                state.end_system_interaction()
            });
        }
    });
}

fn on_blur(session: &Arc<Session>) {
    if !session.config.respect_system_interactions {
        return;
    }

    let debounce = session.config.timings.blur_debounce;
    session.mutate(|inner| {
        if inner.state.system_interaction_active {
            return;
        }
        if inner.has_pending(TimerSlot::Blur) {
            tracing::trace!("restarting blur debounce");
        }
        session.schedule(inner, TimerSlot::Blur, debounce, |state| {
            state.user_interacting = false
        });
    });
}

async fn bring_to_front(session: &Session) {
    let maintain = session.config.maintain_always_on_top;
    let Some((pin, raise)) = session.mutate(|inner| {
        (
            maintain && !inner.state.system_interaction_active,
            inner.state.user_interacting,
        )
    }) else {
        return;
    };

    if pin {
        if let Err(e) = session.surface.set_always_on_top(true).await {
            tracing::warn!(error = %e, "failed to set always on top");
        }
    }

    if raise {
        if let Err(e) = session.surface.bring_to_front().await {
            tracing::warn!(error = %e, "failed to bring window to front");
            return;
        }
        if let Err(e) = session.surface.set_focus(true).await {
            tracing::warn!(error = %e, "failed to focus window");
        }
    }
}
