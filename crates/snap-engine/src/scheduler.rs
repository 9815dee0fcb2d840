//! Cancellable delay timer for the assist picker.
//!
//! The timer itself is advisory: cancellation is best-effort and a fired
//! callback may still be delivered after it was superseded. The orchestrator
//! compares the delivered [`ScheduleToken`] against the live one and drops
//! stale deliveries.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    time::Duration,
};

use tokio::{
    sync::mpsc::{UnboundedSender, WeakUnboundedSender},
    time,
};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::EngineEvent;

/// Opaque identity of one scheduled assist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleToken(pub(crate) u64);

impl Display for ScheduleToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}", self.0)
    }
}

/// Delivers `AssistTimerFired(token)` back to the engine after a delay.
pub trait Scheduler: Send {
    /// Arm the timer, replacing any pending one.
    fn arm(&mut self, token: ScheduleToken, delay: Duration);
    /// Disarm the pending timer, if any.
    fn disarm(&mut self);
}

/// Timer backed by a tokio task per arm, feeding the engine's event channel.
pub struct TokioScheduler {
    /// Engine event channel; weak so the engine loop can end when every
    /// handle is gone.
    tx: WeakUnboundedSender<EngineEvent>,
    /// Cancellation for the pending timer task.
    pending: Option<CancellationToken>,
}

impl TokioScheduler {
    /// Create a scheduler that reports into `tx`.
    pub fn new(tx: &UnboundedSender<EngineEvent>) -> Self {
        Self {
            tx: tx.downgrade(),
            pending: None,
        }
    }
}

impl Scheduler for TokioScheduler {
    fn arm(&mut self, token: ScheduleToken, delay: Duration) {
        self.disarm();
        let cancel = CancellationToken::new();
        let child = cancel.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = time::sleep(delay) => {
                    trace!(%token, "assist_timer_fired");
                    // Engine may already be gone during shutdown.
                    if let Some(tx) = tx.upgrade() {
                        let _ignored = tx.send(EngineEvent::AssistTimerFired(token));
                    }
                }
                _ = child.cancelled() => {
                    trace!(%token, "assist_timer_cancelled");
                }
            }
        });
        self.pending = Some(cancel);
    }

    fn disarm(&mut self) {
        if let Some(cancel) = self.pending.take() {
            cancel.cancel();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}
