//! Scenario replay.
//!
//! Drives an [`Engine`] with the tokio-backed assist timer against the
//! scenario's [`SimWorld`]. `Wait` steps pump the engine's event channel
//! until the deadline, so assist timers fire exactly as they would live.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::Arc,
    time::Duration,
};

use serde::Serialize;
use snap_engine::{
    AssistEvent, AssistNotifier, CandidateView, Engine, EngineEvent, KeyOutcome, SnapConfig,
    SnapRecord, TokioScheduler,
};
use snap_geom::{Rect, Zone};
use snap_world::{SimWorld, WindowId, WindowOps};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver},
    time::{self, Instant},
};
use tracing::{debug, info};

use crate::scenario::{Scenario, Step};

/// One line of the replay transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Entry {
    /// A directional key and what it did.
    Key {
        /// Milliseconds since replay start.
        at_ms: u64,
        /// Arrow pressed.
        direction: String,
        /// Outcome summary.
        outcome: String,
    },
    /// The picker was shown for a zone.
    Picker {
        /// Milliseconds since replay start.
        at_ms: u64,
        /// Zone being filled.
        zone: String,
        /// Zone rectangle.
        target: Rect,
        /// Offered windows, front to back.
        candidates: Vec<CandidateView>,
        /// Zones still queued.
        remaining: Vec<String>,
    },
    /// The picker was hidden.
    PickerHidden {
        /// Milliseconds since replay start.
        at_ms: u64,
        /// Why the sequence ended.
        reason: String,
    },
    /// A scripted user or world action.
    Action {
        /// Milliseconds since replay start.
        at_ms: u64,
        /// Description.
        what: String,
    },
}

impl Display for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Key {
                at_ms,
                direction,
                outcome,
            } => write!(f, "{at_ms:>6}ms  key {direction:<5} -> {outcome}"),
            Self::Picker {
                at_ms,
                zone,
                candidates,
                remaining,
                ..
            } => {
                let names: Vec<_> = candidates
                    .iter()
                    .map(|c| format!("{} [{}]", c.app, c.id))
                    .collect();
                write!(f, "{at_ms:>6}ms  picker {zone}: {}", names.join(", "))?;
                if !remaining.is_empty() {
                    write!(f, " (then {})", remaining.join(", "))?;
                }
                Ok(())
            }
            Self::PickerHidden { at_ms, reason } => {
                write!(f, "{at_ms:>6}ms  picker hidden ({reason})")
            }
            Self::Action { at_ms, what } => write!(f, "{at_ms:>6}ms  {what}"),
        }
    }
}

/// Final geometry of one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalWindow {
    /// Window identity.
    pub id: String,
    /// Owning application.
    pub app: String,
    /// Final frame.
    pub frame: Rect,
    /// Whether the window ended minimized.
    pub minimized: bool,
}

/// Everything a replay produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Transcript in order.
    pub entries: Vec<Entry>,
    /// Windows front to back after the last step.
    pub windows: Vec<FinalWindow>,
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for e in &self.entries {
            writeln!(f, "{e}")?;
        }
        writeln!(f, "final windows:")?;
        for w in &self.windows {
            let r = w.frame;
            write!(
                f,
                "  {:<12} {:<10} ({}, {}) {}x{}",
                w.id, w.app, r.x, r.y, r.w, r.h
            )?;
            if w.minimized {
                write!(f, " minimized")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Replay state.
struct Replay {
    /// Engine under test.
    engine: Engine<TokioScheduler>,
    /// Engine event channel; the scheduler feeds timer events into it.
    events: UnboundedReceiver<EngineEvent>,
    /// Picker updates.
    ui: UnboundedReceiver<AssistEvent>,
    /// Simulated desktop.
    world: SimWorld,
    /// Replay start.
    started: Instant,
    /// Transcript.
    entries: Vec<Entry>,
}

impl Replay {
    /// Milliseconds since start.
    fn now_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Record an action line.
    fn action(&mut self, what: String) {
        let at_ms = self.now_ms();
        self.entries.push(Entry::Action { at_ms, what });
    }

    /// Move queued picker updates into the transcript.
    fn collect_ui(&mut self) {
        let at_ms = self.now_ms();
        while let Ok(ev) = self.ui.try_recv() {
            let entry = match ev {
                AssistEvent::Present(p) => Entry::Picker {
                    at_ms,
                    zone: p.zone.to_spec().to_string(),
                    target: p.target,
                    candidates: p.candidates.iter().map(CandidateView::from).collect(),
                    remaining: p.remaining.iter().map(|z| z.to_spec().to_string()).collect(),
                },
                AssistEvent::Finished(reason) => Entry::PickerHidden {
                    at_ms,
                    reason: format!("{reason:?}"),
                },
            };
            self.entries.push(entry);
        }
    }

    /// Deliver engine events (assist timers) until `d` has elapsed.
    async fn wait(&mut self, d: Duration) {
        let deadline = Instant::now() + d;
        while let Ok(Some(ev)) = time::timeout_at(deadline, self.events.recv()).await {
            self.engine.handle_event(ev);
            self.collect_ui();
        }
    }

    /// Apply one scripted step.
    async fn step(&mut self, step: Step) {
        debug!(?step, "replay_step");
        match step {
            Step::Key(dir) => {
                let outcome = self.engine.on_directional_key(dir);
                let at_ms = self.now_ms();
                self.entries.push(Entry::Key {
                    at_ms,
                    direction: dir.to_spec().to_string(),
                    outcome: describe(outcome),
                });
            }
            Step::Wait(d) => {
                self.wait(d).await;
                return;
            }
            Step::Pick(id) => {
                self.action(format!("pick {id}"));
                self.engine.on_candidate_window_picked(id);
            }
            Step::Dismiss => {
                self.action("dismiss".into());
                self.engine.on_dismiss_requested();
            }
            Step::Close(id) => {
                let existed = self.world.remove_window(id);
                self.action(format!("close {id}{}", if existed { "" } else { " (absent)" }));
            }
            Step::Move(id, frame) => {
                self.world.set_frame(id, frame);
                self.action(format!("move {id} to {frame:?}"));
            }
            Step::Snap(id, zone) => self.external_snap(id, zone),
            Step::DisplayChanged => {
                self.action("display changed".into());
                self.engine.on_display_changed();
            }
        }
        self.collect_ui();
    }

    /// A snap performed outside the keyboard path.
    fn external_snap(&mut self, id: WindowId, zone: Zone) {
        let Some(w) = self.world.windows().into_iter().find(|w| w.id == id) else {
            self.action(format!("snap {id} to {zone} (absent)"));
            return;
        };
        let Ok(usable) = self.world.usable_area(w.display_id) else {
            self.action(format!("snap {id} to {zone} (no display)"));
            return;
        };
        self.world.set_frame(id, zone.rect(usable));
        self.action(format!("snap {id} to {zone}"));
        self.engine.on_another_snap_performed(Some(SnapRecord {
            window: id,
            display: w.display_id,
            zone,
        }));
    }

    /// Final window list.
    fn finish(mut self) -> Report {
        self.engine.shutdown();
        self.collect_ui();
        let windows = self
            .world
            .windows()
            .into_iter()
            .map(|w| FinalWindow {
                id: w.id.to_string(),
                app: w.app,
                frame: w.frame,
                minimized: w.minimized,
            })
            .collect();
        Report {
            entries: self.entries,
            windows,
        }
    }
}

/// Short text for a key outcome.
fn describe(outcome: KeyOutcome) -> String {
    match outcome {
        KeyOutcome::Blocked => "blocked (picker open)".into(),
        KeyOutcome::NoWindow => "no window".into(),
        KeyOutcome::NoDisplay => "no display".into(),
        KeyOutcome::Applied {
            window,
            from,
            action,
        } => format!("{window}: {from} => {action}"),
    }
}

/// Replay `scenario` with `cfg`. Must run inside a tokio runtime with time
/// enabled.
pub async fn replay(scenario: &Scenario, cfg: SnapConfig) -> Report {
    let world = scenario.world();
    let (tx, events) = mpsc::unbounded_channel();
    let (ui_tx, ui) = mpsc::unbounded_channel();
    let engine = Engine::new(
        cfg,
        Arc::new(world.clone()),
        TokioScheduler::new(&tx),
        AssistNotifier::new(ui_tx),
    );
    let mut replay = Replay {
        engine,
        events,
        ui,
        world,
        started: Instant::now(),
        entries: Vec::new(),
    };
    info!(steps = scenario.steps.len(), "replay_start");
    for step in scenario.steps.iter().cloned() {
        replay.step(step).await;
    }
    // Keep the channel open until the replay is done.
    drop(tx);
    replay.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"(
        usable: (x: 0.0, y: 0.0, w: 1000.0, h: 800.0),
        windows: [
            (id: (pid: 1, window_id: 1), app: "Editor", frame: (x: 100.0, y: 100.0, w: 400.0, h: 300.0)),
            (id: (pid: 2, window_id: 2), app: "Browser", frame: (x: 150.0, y: 120.0, w: 500.0, h: 400.0)),
            (id: (pid: 3, window_id: 3), app: "Mail", frame: (x: 220.0, y: 160.0, w: 450.0, h: 350.0)),
        ],
        steps: [
            Key(Left),
            Key(Down),
            Wait("600ms"),
            Key(Up),
            Pick((pid: 2, window_id: 2)),
            Pick((pid: 3, window_id: 3)),
            Wait("1s"),
        ],
    )"#;

    #[tokio::test(start_paused = true)]
    async fn replay_fills_quarters() {
        let scenario = Scenario::from_ron(SCENARIO).unwrap();
        let report = replay(&scenario, scenario.config_with(None)).await;

        let pickers: Vec<_> = report
            .entries
            .iter()
            .filter_map(|e| match e {
                Entry::Picker { zone, .. } => Some(zone.as_str()),
                _ => None,
            })
            .collect();
        // Every window is placed before bottom-right comes up.
        assert_eq!(pickers, vec!["top-left", "top-right"]);
        assert!(report.entries.iter().any(|e| matches!(
            e,
            Entry::Key { outcome, .. } if outcome.starts_with("blocked")
        )));
        assert!(matches!(
            report.entries.last(),
            Some(Entry::PickerHidden { reason, .. }) if reason == "NoCandidates"
        ));

        let frame = |n: u32| {
            report
                .windows
                .iter()
                .find(|w| w.id == format!("{n}:{n}"))
                .map(|w| w.frame)
        };
        assert_eq!(frame(1), Some(Rect::new(0.0, 400.0, 500.0, 400.0)));
        assert_eq!(frame(2), Some(Rect::new(0.0, 0.0, 500.0, 400.0)));
        assert_eq!(frame(3), Some(Rect::new(500.0, 0.0, 500.0, 400.0)));
        assert!(report.to_string().contains("final windows:"));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_shorter_than_delay_shows_nothing() {
        let src = r#"(
            usable: (x: 0.0, y: 0.0, w: 1000.0, h: 800.0),
            windows: [
                (id: (pid: 1, window_id: 1), app: "Editor", frame: (x: 100.0, y: 100.0, w: 400.0, h: 300.0)),
                (id: (pid: 2, window_id: 2), app: "Browser", frame: (x: 150.0, y: 120.0, w: 500.0, h: 400.0)),
            ],
            steps: [Key(Right), Wait("200ms"), Key(Left)],
        )"#;
        let scenario = Scenario::from_ron(src).unwrap();
        let report = replay(&scenario, scenario.config_with(None)).await;
        assert!(
            !report
                .entries
                .iter()
                .any(|e| matches!(e, Entry::Picker { .. }))
        );
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"event\":\"key\""));
    }
}
