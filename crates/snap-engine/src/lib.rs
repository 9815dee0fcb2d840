//! Snap Engine
//!
//! Keyboard-driven window snapping with a follow-up "snap assist" picker:
//! - [`next_action`] maps the frontmost window's [`SnapState`] and an arrow
//!   key to a [`Transition`]
//! - [`OccupancyAnalyzer`] decides which zones are cleanly filled after a snap
//! - [`AssistOrchestrator`] offers candidate windows for each empty zone in
//!   turn
//!
//! [`Engine`] ties these together over a [`WindowOps`] backend. Drive it
//! directly (tests, embedding) or through [`spawn`] and an
//! [`EngineHandle`].
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

mod assist;
mod config;
mod direction;
mod error;
mod notification;
mod occupancy;
mod restore;
mod runtime;
mod scheduler;
pub mod test_support;
mod transition;


use snap_geom::{Rect, Zone};
use snap_world::{DisplayId, WindowId, WindowOps};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, trace, warn};

pub use assist::{
    AssistOrchestrator, AssistPhase, AssistStep, FinishReason, PendingAssist, Presentation,
    SnapRecord,
};
pub use config::{
    DEFAULT_ASSIST_DELAY_MS, DEFAULT_MIN_WINDOW_SIZE, DEFAULT_RESTORE_FRACTION, SnapConfig,
};
pub use direction::SnapDirection;
pub use error::{Error, Result};
pub use notification::{AssistEvent, AssistNotifier, CandidateView};
pub use occupancy::OccupancyAnalyzer;
pub use restore::{RESTORE_CAP, RestoreMemory};
pub use runtime::{EngineEvent, EngineHandle, spawn};
pub use scheduler::{ScheduleToken, Scheduler, TokioScheduler};
pub use transition::{SnapState, Transition, detect_state, lookup, next_action};

/// What a directional key did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The assist picker is modal; the key was not acted on.
    Blocked,
    /// No standard window to act on.
    NoWindow,
    /// The window's display could not be resolved.
    NoDisplay,
    /// A transition was executed (placement is best-effort).
    Applied {
        /// Window acted on.
        window: WindowId,
        /// State detected before the key.
        from: SnapState,
        /// Action taken.
        action: Transition,
    },
}

/// Snapping engine: executes directional transitions and owns the assist
/// lifecycle.
pub struct Engine<S: Scheduler> {
    /// Sanitized configuration.
    cfg: SnapConfig,
    /// Window backend.
    ops: Arc<dyn WindowOps>,
    /// Assist delay timer.
    scheduler: S,
    /// Assist state machine.
    assist: AssistOrchestrator,
    /// Pre-snap frames for un-snapping.
    restore: RestoreMemory,
    /// Picker UI channel.
    notifier: AssistNotifier,
    /// Shared copy of [`Self::is_assist_active`].
    active: Arc<AtomicBool>,
}

impl<S: Scheduler> Engine<S> {
    /// Create an engine. `cfg` is sanitized on the way in.
    pub fn new(
        cfg: SnapConfig,
        ops: Arc<dyn WindowOps>,
        scheduler: S,
        notifier: AssistNotifier,
    ) -> Self {
        let cfg = cfg.sanitized();
        Self {
            assist: AssistOrchestrator::new(&cfg),
            cfg,
            ops,
            scheduler,
            restore: RestoreMemory::new(),
            notifier,
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &SnapConfig {
        &self.cfg
    }

    /// The assist state machine, for inspection.
    pub fn assist(&self) -> &AssistOrchestrator {
        &self.assist
    }

    /// Remembered pre-snap frames.
    pub fn restore_memory(&self) -> &RestoreMemory {
        &self.restore
    }

    /// True while the picker is modal. Directional keys are ignored then.
    pub fn is_assist_active(&self) -> bool {
        self.assist.is_active()
    }

    /// Flag mirrored after every event, for handles on other tasks.
    pub fn active_flag(&self) -> Arc<AtomicBool> {
        self.active.clone()
    }

    /// Publish the modal flag.
    fn sync_active(&self) {
        self.active.store(self.assist.is_active(), Ordering::SeqCst);
    }

    /// Forward a step to the picker UI.
    fn notify(&self, step: &AssistStep) {
        if let Err(e) = self.notifier.send_step(step) {
            warn!(error = %e, "assist notification dropped");
        }
    }

    /// Cancel any assist and disarm the timer. Only a visible picker is told
    /// to hide.
    fn cancel_assist(&mut self, reason: FinishReason) -> AssistStep {
        let was_presenting = self.assist.is_active();
        let step = self.assist.cancel(reason);
        self.scheduler.disarm();
        self.sync_active();
        if was_presenting {
            self.notify(&step);
        }
        step
    }

    /// Arm an assist for a half or quarter snap.
    fn schedule_assist(&mut self, snap: SnapRecord) {
        if !self.cfg.assist_enabled || !(snap.zone.is_half() || snap.zone.is_quarter()) {
            return;
        }
        let token = self.assist.schedule(snap);
        self.scheduler.arm(token, self.cfg.assist_delay());
    }

    /// Handle an arrow key for the frontmost window.
    pub fn on_directional_key(&mut self, direction: SnapDirection) -> KeyOutcome {
        if self.assist.is_active() {
            debug!(%direction, "directional key ignored while assist is presenting");
            return KeyOutcome::Blocked;
        }
        let Some(front) = self.ops.frontmost_window() else {
            debug!(%direction, "no frontmost window");
            return KeyOutcome::NoWindow;
        };
        let usable = match self.ops.usable_area(front.display_id) {
            Ok(r) => r,
            Err(e) => {
                warn!(display = front.display_id, error = %e, "usable area unavailable");
                return KeyOutcome::NoDisplay;
            }
        };
        let from = detect_state(&front.frame, usable, self.cfg.state_fit);
        let action = next_action(from, direction);
        info!(window = %front.id, app = %front.app, %direction, %from, %action, "snap_key");

        // A new snap supersedes whatever assist was scheduled.
        self.cancel_assist(FinishReason::Cancelled);

        match action {
            Transition::SnapTo(zone) => {
                if from == SnapState::Unsnapped {
                    self.restore.remember(front.id, front.frame);
                }
                self.place(front.id, zone.rect(usable));
                self.schedule_assist(SnapRecord {
                    window: front.id,
                    display: front.display_id,
                    zone,
                });
            }
            Transition::ReturnToCenter => {
                let target =
                    self.restore
                        .centered_frame(front.id, usable, self.cfg.restore_fraction);
                self.place(front.id, target);
            }
            Transition::Minimize => {
                if let Err(e) = self.ops.minimize_window(front.id) {
                    warn!(window = %front.id, error = %e, "minimize failed");
                }
            }
        }
        self.sync_active();
        KeyOutcome::Applied {
            window: front.id,
            from,
            action,
        }
    }

    /// Handle an arrow key given as a virtual keycode; `None` for other keys.
    pub fn on_key_code(&mut self, code: u16) -> Option<KeyOutcome> {
        SnapDirection::from_keycode(code).map(|dir| self.on_directional_key(dir))
    }

    /// Best-effort placement.
    fn place(&self, id: WindowId, target: Rect) {
        if let Err(e) = self.ops.place_window(id, target) {
            warn!(window = %id, error = %e, "placement failed");
        }
    }

    /// The assist delay elapsed.
    pub fn on_assist_timer_fired(&mut self, token: ScheduleToken) -> AssistStep {
        let step = self.assist.on_timer_fired(token, &*self.ops);
        self.sync_active();
        self.notify(&step);
        step
    }

    /// The user picked `id` in the picker.
    pub fn on_candidate_window_picked(&mut self, id: WindowId) -> AssistStep {
        let step = self.assist.on_pick(id, &*self.ops);
        self.sync_active();
        self.notify(&step);
        step
    }

    /// The user dismissed the picker (Escape or click outside).
    pub fn on_dismiss_requested(&mut self) -> AssistStep {
        self.cancel_assist(FinishReason::Dismissed)
    }

    /// A window was snapped by some other path (mouse drag, menu). Cancels
    /// any assist; a half or quarter snap schedules a fresh one.
    pub fn on_another_snap_performed(&mut self, snap: Option<SnapRecord>) -> AssistStep {
        let step = self.cancel_assist(FinishReason::Cancelled);
        if let Some(snap) = snap {
            self.schedule_assist(snap);
        }
        step
    }

    /// Displays changed; zone geometry is no longer trustworthy.
    pub fn on_display_changed(&mut self) -> AssistStep {
        self.cancel_assist(FinishReason::Cancelled)
    }

    /// Stop: cancel everything pending.
    pub fn shutdown(&mut self) {
        self.cancel_assist(FinishReason::Cancelled);
    }

    /// Apply one event. Returns `false` on shutdown.
    pub fn handle_event(&mut self, event: EngineEvent) -> bool {
        trace!(?event, "engine_event");
        match event {
            EngineEvent::DirectionalKey(dir) => {
                self.on_directional_key(dir);
            }
            EngineEvent::AssistTimerFired(token) => {
                self.on_assist_timer_fired(token);
            }
            EngineEvent::CandidatePicked(id) => {
                self.on_candidate_window_picked(id);
            }
            EngineEvent::DismissRequested => {
                self.on_dismiss_requested();
            }
            EngineEvent::SnapPerformed(snap) => {
                self.on_another_snap_performed(snap);
            }
            EngineEvent::DisplayChanged => {
                self.on_display_changed();
            }
            EngineEvent::Shutdown => return false,
        }
        true
    }

    /// Process events until shutdown or until every sender is dropped.
    pub async fn run(mut self, mut rx: UnboundedReceiver<EngineEvent>) {
        while let Some(event) = rx.recv().await {
            if !self.handle_event(event) {
                break;
            }
        }
        self.shutdown();
        debug!("engine_stopped");
    }

    /// Zones that would be offered if `zone` had just been snapped on
    /// `display`, without scheduling anything.
    pub fn preview_zones(&self, zone: Zone, display: DisplayId) -> Result<Vec<Zone>> {
        let usable = self.ops.usable_area(display)?;
        let snapshot = self.ops.snapshot_windows(display);
        Ok(self
            .assist
            .analyzer()
            .zones_needing_fill(zone, usable, &snapshot))
    }
}
