//! Focus monitor - periodic focus sampling and always-on-top enforcement.

use crate::session::{Session, TimerSlot};
use crate::state::FocusTransition;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Start the monitor loop for `session`.
///
/// The first tick happens one interval after start. Each tick runs as its
/// own task, so a slow platform call never delays the next tick.
pub(crate) fn spawn(session: Arc<Session>) -> JoinHandle<()> {
    let runtime = session.runtime.clone();
    let period = effective_period(session.config.focus_check_interval);
    let first_tick = Instant::now() + period;

    runtime.spawn(async move {
        let mut ticker = tokio::time::interval_at(first_tick, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("Focus monitor started with interval {:?}", period);

        loop {
            tokio::select! {
                _ = session.token().cancelled() => break,
                _ = ticker.tick() => {
                    let tick_session = Arc::clone(&session);
                    session.spawn_command(async move { tick(&tick_session).await });
                }
            }
        }

        tracing::info!("Focus monitor stopped");
    })
}

/// tokio intervals reject a zero period.
fn effective_period(configured: Duration) -> Duration {
    if configured.is_zero() {
        tracing::warn!("zero focus check interval, using {:?}", MIN_PERIOD);
    }
    configured.max(MIN_PERIOD)
}

/// One monitor step.
///
/// Focus transitions (and their callbacks) are handled before the decay and
/// enforcement checks.
pub(crate) async fn tick(session: &Session) {
    let observed = match session.surface.is_focused().await {
        Ok(focused) => Some(focused),
        Err(e) => {
            tracing::warn!(error = %e, "focus query failed");
            None
        }
    };

    if let Some(focused) = observed {
        let Some(transition) = session.mutate(|inner| {
            let transition = inner.state.observe_focus(focused, Instant::now());
            if transition == Some(FocusTransition::Gained) {
                inner.cancel_timer(TimerSlot::Blur);
            }
            transition
        }) else {
            return;
        };

        if let Some(transition) = transition {
            tracing::debug!(?transition, "window focus changed");
            let callback = match transition {
                FocusTransition::Gained => session.config.on_focus_gained.as_ref(),
                FocusTransition::Lost => session.config.on_focus_lost.as_ref(),
            };
            if let Some(callback) = callback {
                callback();
            }
        }
    }

    let timings = session.config.timings;
    let maintain = session.config.maintain_always_on_top;
    let Some(enforce) = session.mutate(|inner| {
        let now = Instant::now();
        if inner.state.decay(now, timings.interaction_timeout) {
            tracing::debug!("user interaction timed out");
        }
        maintain && inner.state.should_enforce(now, timings.enforcement_window)
    }) else {
        return;
    };

    if enforce {
        if let Err(e) = session.surface.set_always_on_top(true).await {
            tracing::warn!(error = %e, "failed to re-assert always on top");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_period_is_clamped() {
        assert_eq!(effective_period(Duration::ZERO), MIN_PERIOD);
        assert_eq!(
            effective_period(Duration::from_millis(2000)),
            Duration::from_millis(2000)
        );
    }
}
