//! Test support utilities for snap-engine unit and integration tests.
//! These helpers are public so the `tests/` suites can share them.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use snap_geom::Rect;
use snap_world::{SimWorld, WindowId};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::{AssistEvent, AssistNotifier, Engine, ScheduleToken, Scheduler, SnapConfig};

/// Usable area used across the test suites.
pub fn desktop() -> Rect {
    Rect::new(0.0, 25.0, 1440.0, 875.0)
}

/// Window id with a distinct pid per window.
pub fn wid(n: u32) -> WindowId {
    WindowId::new(1000 + n as i32, n)
}

/// Recorded scheduler state.
#[derive(Debug, Default)]
struct ManualState {
    /// Currently armed token and delay.
    armed: Option<(ScheduleToken, Duration)>,
    /// Every token ever armed.
    history: Vec<ScheduleToken>,
    /// Number of `disarm` calls.
    disarms: usize,
}

/// Scheduler that never fires on its own; tests fire tokens explicitly.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    /// Shared with clones held by the test.
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Armed token and delay, if any.
    pub fn armed(&self) -> Option<(ScheduleToken, Duration)> {
        self.state.lock().armed
    }

    /// Take the armed token, as if the timer fired.
    pub fn take_armed(&self) -> Option<ScheduleToken> {
        self.state.lock().armed.take().map(|(t, _)| t)
    }

    /// All tokens armed so far.
    pub fn history(&self) -> Vec<ScheduleToken> {
        self.state.lock().history.clone()
    }

    /// Number of disarm calls.
    pub fn disarm_count(&self) -> usize {
        self.state.lock().disarms
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&mut self, token: ScheduleToken, delay: Duration) {
        let mut st = self.state.lock();
        st.armed = Some((token, delay));
        st.history.push(token);
    }

    fn disarm(&mut self) {
        let mut st = self.state.lock();
        st.armed = None;
        st.disarms += 1;
    }
}

/// Engine over `world` with a manual scheduler and a captured UI channel.
pub fn test_engine(
    world: &SimWorld,
    cfg: SnapConfig,
) -> (
    Engine<ManualScheduler>,
    ManualScheduler,
    UnboundedReceiver<AssistEvent>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let sched = ManualScheduler::new();
    let engine = Engine::new(
        cfg,
        Arc::new(world.clone()),
        sched.clone(),
        AssistNotifier::new(tx),
    );
    (engine, sched, rx)
}

/// Drain every event currently queued on `rx`.
pub fn drain(rx: &mut UnboundedReceiver<AssistEvent>) -> Vec<AssistEvent> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}
