//! Async driver: a single task owns the [`Engine`] and applies events in
//! arrival order, so each snap fully resolves (including arming or cancelling
//! the assist timer) before the next event is seen.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use snap_world::{WindowId, WindowOps};
use tokio::{
    sync::mpsc::{self, UnboundedSender},
    task::JoinHandle,
};

use crate::{
    AssistNotifier, Engine, Error, Result, ScheduleToken, SnapConfig, SnapDirection, SnapRecord,
    TokioScheduler,
};

/// Inputs accepted by the engine loop.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// An arrow-key chord with the snap modifier was pressed.
    DirectionalKey(SnapDirection),
    /// The assist delay elapsed for `token`.
    AssistTimerFired(ScheduleToken),
    /// The user chose a window in the picker.
    CandidatePicked(WindowId),
    /// The user dismissed the picker.
    DismissRequested,
    /// Some other path snapped a window.
    SnapPerformed(Option<SnapRecord>),
    /// Displays were added, removed or rearranged.
    DisplayChanged,
    /// Stop the loop.
    Shutdown,
}

/// Cheap handle for feeding an engine running under [`spawn`].
#[derive(Clone)]
pub struct EngineHandle {
    /// Event channel into the engine task.
    tx: UnboundedSender<EngineEvent>,
    /// Mirrors [`Engine::is_assist_active`].
    active: Arc<AtomicBool>,
}

impl EngineHandle {
    /// Queue an event.
    pub fn send(&self, event: EngineEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| Error::ChannelClosed)
    }

    /// Queue a directional key.
    pub fn key(&self, direction: SnapDirection) -> Result<()> {
        self.send(EngineEvent::DirectionalKey(direction))
    }

    /// Queue a raw virtual keycode. Returns `false` for non-arrow keys, which
    /// are not consumed.
    pub fn key_code(&self, code: u16) -> Result<bool> {
        match SnapDirection::from_keycode(code) {
            Some(dir) => self.key(dir).map(|()| true),
            None => Ok(false),
        }
    }

    /// Queue a picker selection.
    pub fn pick(&self, id: WindowId) -> Result<()> {
        self.send(EngineEvent::CandidatePicked(id))
    }

    /// Queue a picker dismissal.
    pub fn dismiss(&self) -> Result<()> {
        self.send(EngineEvent::DismissRequested)
    }

    /// Queue a display reconfiguration.
    pub fn display_changed(&self) -> Result<()> {
        self.send(EngineEvent::DisplayChanged)
    }

    /// Ask the loop to stop.
    pub fn shutdown(&self) -> Result<()> {
        self.send(EngineEvent::Shutdown)
    }

    /// True while the picker is modal; hotkey routing checks this before
    /// forwarding keys.
    pub fn is_assist_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Start an engine task with a tokio-backed assist timer.
pub fn spawn(
    cfg: SnapConfig,
    ops: Arc<dyn WindowOps>,
    notifier: AssistNotifier,
) -> (EngineHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let engine = Engine::new(cfg, ops, TokioScheduler::new(&tx), notifier);
    let handle = EngineHandle {
        tx,
        active: engine.active_flag(),
    };
    let join = tokio::spawn(engine.run(rx));
    (handle, join)
}
