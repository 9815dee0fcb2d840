//! Snap assist orchestration.
//!
//! State machine: `Idle -> Scheduled -> Presenting(zone) -> ... -> Idle`.
//! Any non-idle state returns to `Idle` on cancel or dismiss. The
//! orchestrator owns the single [`PendingAssist`]; callers only submit
//! events and read the current phase.

use std::{collections::VecDeque, mem};

use snap_geom::{FitTolerance, Rect, Zone};
use snap_world::{DisplayId, Error as WorldError, WindowId, WindowObservation, WindowOps, find_window};
use tracing::{debug, info, trace, warn};

use crate::{OccupancyAnalyzer, ScheduleToken, SnapConfig, SnapState, detect_state};

/// A completed snap that may trigger an assist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapRecord {
    /// The window that was snapped.
    pub window: WindowId,
    /// Display the window was snapped on.
    pub display: DisplayId,
    /// Zone it was snapped into.
    pub zone: Zone,
}

/// Live assist sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingAssist {
    /// Zones still needing a window; the head is the active zone.
    queue: VecDeque<Zone>,
    /// The snapped window, never offered.
    excluded: WindowId,
    /// Windows placed during this sequence.
    placed: Vec<WindowId>,
    /// Display the sequence runs on.
    display: DisplayId,
    /// Token of the schedule that started the sequence.
    token: ScheduleToken,
}

impl PendingAssist {
    /// Zone currently offered; always the head of the queue.
    pub fn active_zone(&self) -> Option<Zone> {
        self.queue.front().copied()
    }

    /// Remaining zones in offer order, active zone first.
    pub fn queue(&self) -> Vec<Zone> {
        self.queue.iter().copied().collect()
    }

    /// The snapped window.
    pub fn excluded_window(&self) -> WindowId {
        self.excluded
    }

    /// Windows placed so far.
    pub fn placed(&self) -> &[WindowId] {
        &self.placed
    }

    /// Display the sequence runs on.
    pub fn display(&self) -> DisplayId {
        self.display
    }

    /// Token of the originating schedule.
    pub fn token(&self) -> ScheduleToken {
        self.token
    }

    /// Windows never offered as candidates in this sequence.
    fn exclusions(&self) -> Vec<WindowId> {
        let mut ids = Vec::with_capacity(self.placed.len() + 1);
        ids.push(self.excluded);
        ids.extend_from_slice(&self.placed);
        ids
    }
}

/// Why an assist sequence ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinishReason {
    /// Nothing left to fill after the snap.
    NothingToFill,
    /// No windows left to offer.
    NoCandidates,
    /// Every queued zone was handled.
    Completed,
    /// The user dismissed the picker.
    Dismissed,
    /// Superseded by another snap or a display change.
    Cancelled,
    /// The snapped window moved, closed, or left its zone before the delay
    /// elapsed.
    SnappedWindowMoved,
    /// The display went away.
    DisplayUnavailable,
}

/// What the picker should show.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Zone being filled.
    pub zone: Zone,
    /// Rectangle of that zone.
    pub target: Rect,
    /// Windows to choose from, front to back.
    pub candidates: Vec<WindowObservation>,
    /// Zones queued after this one.
    pub remaining: Vec<Zone>,
}

/// Outcome of feeding an event to the orchestrator.
#[derive(Clone, Debug, PartialEq)]
pub enum AssistStep {
    /// The event had no effect (stale timer, idle dismiss, non-candidate pick).
    Ignored,
    /// Present (or re-present) the picker.
    Present(Presentation),
    /// The sequence ended.
    Finished(FinishReason),
}

/// Observable phase of the orchestrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssistPhase {
    /// Nothing pending.
    Idle,
    /// Waiting for the delay to elapse.
    Scheduled,
    /// Picker shown for a zone.
    Presenting(Zone),
}

/// Internal state.
#[derive(Debug)]
enum Phase {
    /// Nothing pending.
    Idle,
    /// Timer armed.
    Scheduled {
        /// The snap that armed the timer.
        snap: SnapRecord,
        /// The only token that may promote this schedule.
        token: ScheduleToken,
    },
    /// Picker shown.
    Presenting(PendingAssist),
}

/// Drives the sequential "pick a window for each empty zone" flow.
#[derive(Debug)]
pub struct AssistOrchestrator {
    /// Occupancy rules.
    analyzer: OccupancyAnalyzer,
    /// Tolerance used to confirm the snapped window is still in place.
    state_fit: FitTolerance,
    /// Current phase.
    phase: Phase,
    /// Monotonic generation; bumped on every schedule and cancel.
    generation: u64,
}

impl AssistOrchestrator {
    /// Idle orchestrator using `cfg`.
    pub fn new(cfg: &SnapConfig) -> Self {
        Self {
            analyzer: OccupancyAnalyzer::new(cfg),
            state_fit: cfg.state_fit,
            phase: Phase::Idle,
            generation: 0,
        }
    }

    /// The occupancy analyzer in use.
    pub fn analyzer(&self) -> &OccupancyAnalyzer {
        &self.analyzer
    }

    /// Current phase.
    pub fn phase(&self) -> AssistPhase {
        match &self.phase {
            Phase::Idle => AssistPhase::Idle,
            Phase::Scheduled { .. } => AssistPhase::Scheduled,
            Phase::Presenting(p) => match p.active_zone() {
                Some(z) => AssistPhase::Presenting(z),
                None => AssistPhase::Idle,
            },
        }
    }

    /// True while the picker is modal.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Presenting(_))
    }

    /// True while the delay timer is armed.
    pub fn is_scheduled(&self) -> bool {
        matches!(self.phase, Phase::Scheduled { .. })
    }

    /// The live sequence, if presenting.
    pub fn pending(&self) -> Option<&PendingAssist> {
        match &self.phase {
            Phase::Presenting(p) => Some(p),
            _ => None,
        }
    }

    /// Token of the armed schedule, if any.
    pub fn scheduled_token(&self) -> Option<ScheduleToken> {
        match &self.phase {
            Phase::Scheduled { token, .. } => Some(*token),
            _ => None,
        }
    }

    /// Mint a token that invalidates every earlier one.
    fn next_token(&mut self) -> ScheduleToken {
        self.generation = self.generation.wrapping_add(1);
        ScheduleToken(self.generation)
    }

    /// Arm a new assist for `snap`, superseding anything pending.
    pub fn schedule(&mut self, snap: SnapRecord) -> ScheduleToken {
        if !matches!(self.phase, Phase::Idle) {
            debug!(window = %snap.window, "assist superseded by new snap");
        }
        let token = self.next_token();
        trace!(%token, zone = %snap.zone, window = %snap.window, "assist_scheduled");
        self.phase = Phase::Scheduled { snap, token };
        token
    }

    /// Return to idle from any state. Idle stays idle and reports `Ignored`.
    pub fn cancel(&mut self, reason: FinishReason) -> AssistStep {
        let was_idle = matches!(self.phase, Phase::Idle);
        // Invalidate outstanding tokens even when idle.
        self.next_token();
        if was_idle {
            return AssistStep::Ignored;
        }
        self.finish(reason)
    }

    /// Enter idle and report `reason`.
    fn finish(&mut self, reason: FinishReason) -> AssistStep {
        self.phase = Phase::Idle;
        debug!(?reason, "assist_finished");
        AssistStep::Finished(reason)
    }

    /// Promote a schedule to a presentation once its delay has elapsed.
    pub fn on_timer_fired(&mut self, token: ScheduleToken, ops: &dyn WindowOps) -> AssistStep {
        let snap = match &self.phase {
            Phase::Scheduled { snap, token: live } if *live == token => *snap,
            _ => {
                trace!(%token, "stale assist timer ignored");
                return AssistStep::Ignored;
            }
        };
        self.phase = Phase::Idle;

        let usable = match ops.usable_area(snap.display) {
            Ok(r) => r,
            Err(e) => {
                warn!(display = snap.display, error = %e, "assist: usable area unavailable");
                return self.finish(FinishReason::DisplayUnavailable);
            }
        };
        let snapshot = ops.snapshot_windows(snap.display);

        let in_place = find_window(&snapshot, snap.window).is_some_and(|w| {
            detect_state(&w.frame, usable, self.state_fit) == SnapState::Snapped(snap.zone)
        });
        if !in_place {
            debug!(window = %snap.window, zone = %snap.zone, "snapped window no longer in place");
            return self.finish(FinishReason::SnappedWindowMoved);
        }

        let zones = self
            .analyzer
            .zones_needing_fill(snap.zone, usable, &snapshot);
        if zones.is_empty() {
            return self.finish(FinishReason::NothingToFill);
        }
        info!(snapped = %snap.zone, zones = ?zones, "assist: zones need filling");

        let pending = PendingAssist {
            queue: zones.into(),
            excluded: snap.window,
            placed: Vec::new(),
            display: snap.display,
            token,
        };
        self.present(pending, usable, &snapshot)
    }

    /// Present the queue head with fresh candidates, or finish.
    fn present(
        &mut self,
        pending: PendingAssist,
        usable: Rect,
        snapshot: &[WindowObservation],
    ) -> AssistStep {
        let Some(zone) = pending.active_zone() else {
            return self.finish(FinishReason::Completed);
        };
        let candidates = self
            .analyzer
            .candidates(zone, usable, snapshot, &pending.exclusions());
        if candidates.is_empty() {
            return self.finish(FinishReason::NoCandidates);
        }
        let presentation = Presentation {
            zone,
            target: zone.rect(usable),
            candidates,
            remaining: pending.queue.iter().skip(1).copied().collect(),
        };
        debug!(%zone, candidates = presentation.candidates.len(), "assist_present");
        self.phase = Phase::Presenting(pending);
        AssistStep::Present(presentation)
    }

    /// Place the picked window into the active zone and advance.
    ///
    /// A pick whose window has vanished abandons the active zone and moves on
    /// to the next one.
    pub fn on_pick(&mut self, id: WindowId, ops: &dyn WindowOps) -> AssistStep {
        let mut pending = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Presenting(p) => p,
            other => {
                self.phase = other;
                debug!(window = %id, "pick while not presenting ignored");
                return AssistStep::Ignored;
            }
        };
        let Some(zone) = pending.active_zone() else {
            return self.finish(FinishReason::Completed);
        };
        let usable = match ops.usable_area(pending.display) {
            Ok(r) => r,
            Err(e) => {
                warn!(display = pending.display, error = %e, "assist: usable area unavailable");
                return self.finish(FinishReason::DisplayUnavailable);
            }
        };
        let snapshot = ops.snapshot_windows(pending.display);

        if find_window(&snapshot, id).is_none() {
            warn!(window = %id, %zone, "picked window is gone; abandoning zone");
            pending.queue.pop_front();
            return self.present(pending, usable, &snapshot);
        }
        let offered = self
            .analyzer
            .candidates(zone, usable, &snapshot, &pending.exclusions());
        if !offered.iter().any(|w| w.id == id) {
            debug!(window = %id, %zone, "picked window is not a candidate");
            self.phase = Phase::Presenting(pending);
            return AssistStep::Ignored;
        }

        let target = zone.rect(usable);
        match ops.place_window(id, target) {
            Ok(()) => {}
            Err(WorldError::WindowGone(_)) => {
                warn!(window = %id, %zone, "picked window vanished during placement");
                pending.queue.pop_front();
                let snapshot = ops.snapshot_windows(pending.display);
                return self.present(pending, usable, &snapshot);
            }
            Err(e) => warn!(window = %id, %zone, error = %e, "assist placement failed"),
        }
        if let Err(e) = ops.activate_and_raise(id) {
            warn!(window = %id, error = %e, "assist raise failed");
        }
        info!(window = %id, %zone, "assist placed window");

        pending.queue.pop_front();
        pending.placed.push(id);
        let snapshot = ops.snapshot_windows(pending.display);
        self.present(pending, usable, &snapshot)
    }
}

#[cfg(test)]
mod tests {
    use snap_world::{SimCall, SimWindow, SimWorld};

    use super::*;

    fn area() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 800.0)
    }

    fn wid(n: u32) -> WindowId {
        WindowId::new(100 + n as i32, n)
    }

    /// World with window 1 snapped to `zone` at the front plus floating extras.
    fn world(zone: Zone, extras: u32) -> SimWorld {
        let w = SimWorld::with_display(area());
        w.push_back(SimWindow::new(wid(1), "Snapped", zone.rect(area())));
        for n in 0..extras {
            let off = 20.0 * f64::from(n);
            w.push_back(SimWindow::new(
                wid(10 + n),
                "Other",
                Rect::new(120.0 + off, 90.0 + off, 420.0, 330.0),
            ));
        }
        w
    }

    fn record(zone: Zone) -> SnapRecord {
        SnapRecord {
            window: wid(1),
            display: 1,
            zone,
        }
    }

    fn orchestrator() -> AssistOrchestrator {
        AssistOrchestrator::new(&SnapConfig::default())
    }

    #[test]
    fn stale_token_is_ignored() {
        let world = world(Zone::LeftHalf, 2);
        let mut o = orchestrator();
        let first = o.schedule(record(Zone::LeftHalf));
        let second = o.schedule(record(Zone::LeftHalf));
        assert_ne!(first, second);
        assert_eq!(o.on_timer_fired(first, &world), AssistStep::Ignored);
        assert_eq!(o.phase(), AssistPhase::Scheduled);
        assert_eq!(o.scheduled_token(), Some(second));
        assert!(matches!(o.on_timer_fired(second, &world), AssistStep::Present(_)));
    }

    #[test]
    fn cancel_invalidates_schedule() {
        let world = world(Zone::LeftHalf, 2);
        let mut o = orchestrator();
        let token = o.schedule(record(Zone::LeftHalf));
        assert_eq!(
            o.cancel(FinishReason::Cancelled),
            AssistStep::Finished(FinishReason::Cancelled)
        );
        assert_eq!(o.on_timer_fired(token, &world), AssistStep::Ignored);
        assert_eq!(o.phase(), AssistPhase::Idle);
        assert_eq!(o.cancel(FinishReason::Dismissed), AssistStep::Ignored);
    }

    #[test]
    fn half_snap_presents_whole_opposite_half() {
        let world = world(Zone::LeftHalf, 2);
        let mut o = orchestrator();
        let token = o.schedule(record(Zone::LeftHalf));
        let AssistStep::Present(p) = o.on_timer_fired(token, &world) else {
            panic!("expected presentation");
        };
        assert_eq!(p.zone, Zone::RightHalf);
        assert_eq!(p.target, Rect::new(500.0, 0.0, 500.0, 800.0));
        assert!(p.remaining.is_empty());
        let ids: Vec<_> = p.candidates.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![wid(10), wid(11)]);
        assert!(o.is_active());
        let pending = o.pending().unwrap();
        assert_eq!(pending.active_zone(), pending.queue().first().copied());
        assert_eq!(pending.excluded_window(), wid(1));
    }

    #[test]
    fn pick_places_and_completes() {
        let world = world(Zone::LeftHalf, 2);
        let mut o = orchestrator();
        let token = o.schedule(record(Zone::LeftHalf));
        o.on_timer_fired(token, &world);
        let step = o.on_pick(wid(11), &world);
        assert_eq!(step, AssistStep::Finished(FinishReason::Completed));
        assert_eq!(world.frame_of(wid(11)), Some(Zone::RightHalf.rect(area())));
        assert!(world.calls().contains(&SimCall::Raise(wid(11))));
        assert!(!o.is_active());
    }

    #[test]
    fn no_candidates_goes_idle() {
        let world = world(Zone::LeftHalf, 0);
        let mut o = orchestrator();
        let token = o.schedule(record(Zone::LeftHalf));
        assert_eq!(
            o.on_timer_fired(token, &world),
            AssistStep::Finished(FinishReason::NoCandidates)
        );
    }

    #[test]
    fn filled_screen_needs_no_assist() {
        let world = world(Zone::LeftHalf, 0);
        world.push_back(SimWindow::new(wid(2), "Right", Zone::RightHalf.rect(area())));
        let mut o = orchestrator();
        let token = o.schedule(record(Zone::LeftHalf));
        assert_eq!(
            o.on_timer_fired(token, &world),
            AssistStep::Finished(FinishReason::NothingToFill)
        );
    }

    #[test]
    fn moved_snapped_window_abandons_assist() {
        let world = world(Zone::LeftHalf, 2);
        let mut o = orchestrator();
        let token = o.schedule(record(Zone::LeftHalf));
        world.set_frame(wid(1), Rect::new(200.0, 200.0, 400.0, 300.0));
        assert_eq!(
            o.on_timer_fired(token, &world),
            AssistStep::Finished(FinishReason::SnappedWindowMoved)
        );
    }

    #[test]
    fn snapped_window_on_other_display_abandons_assist() {
        let world = world(Zone::LeftHalf, 2);
        world.set_display(2, area());
        let mut o = orchestrator();
        let token = o.schedule(record(Zone::LeftHalf));
        world.set_display_of(wid(1), 2);
        assert_eq!(
            o.on_timer_fired(token, &world),
            AssistStep::Finished(FinishReason::SnappedWindowMoved)
        );
    }

    #[test]
    fn vanished_pick_abandons_zone() {
        let world = world(Zone::TopLeftQuarter, 3);
        let mut o = orchestrator();
        let token = o.schedule(record(Zone::TopLeftQuarter));
        let AssistStep::Present(p) = o.on_timer_fired(token, &world) else {
            panic!("expected presentation");
        };
        assert_eq!(p.zone, Zone::TopRightQuarter);
        assert_eq!(
            p.remaining,
            vec![Zone::BottomLeftQuarter, Zone::BottomRightQuarter]
        );
        world.remove_window(wid(10));
        let AssistStep::Present(p) = o.on_pick(wid(10), &world) else {
            panic!("expected next zone");
        };
        assert_eq!(p.zone, Zone::BottomLeftQuarter);
        assert_eq!(o.pending().unwrap().placed(), &[] as &[WindowId]);
    }

    #[test]
    fn quarter_queue_drains_when_candidates_run_out() {
        let world = world(Zone::TopLeftQuarter, 2);
        let mut o = orchestrator();
        let token = o.schedule(record(Zone::TopLeftQuarter));
        let AssistStep::Present(p) = o.on_timer_fired(token, &world) else {
            panic!("expected presentation");
        };
        assert_eq!(p.zone, Zone::TopRightQuarter);
        assert_eq!(p.candidates.len(), 2);

        let AssistStep::Present(p) = o.on_pick(wid(10), &world) else {
            panic!("expected second zone");
        };
        assert_eq!(p.zone, Zone::BottomLeftQuarter);
        assert_eq!(p.remaining, vec![Zone::BottomRightQuarter]);

        assert_eq!(
            o.on_pick(wid(11), &world),
            AssistStep::Finished(FinishReason::NoCandidates)
        );
        assert_eq!(o.phase(), AssistPhase::Idle);
        assert_eq!(world.frame_of(wid(10)), Some(Zone::TopRightQuarter.rect(area())));
        assert_eq!(world.frame_of(wid(11)), Some(Zone::BottomLeftQuarter.rect(area())));
    }

    #[test]
    fn non_candidate_pick_is_ignored() {
        let world = world(Zone::LeftHalf, 1);
        let mut o = orchestrator();
        let token = o.schedule(record(Zone::LeftHalf));
        o.on_timer_fired(token, &world);
        assert_eq!(o.on_pick(wid(1), &world), AssistStep::Ignored);
        assert_eq!(o.phase(), AssistPhase::Presenting(Zone::RightHalf));
    }

    #[test]
    fn failed_placement_still_advances() {
        let world = world(Zone::LeftHalf, 1);
        let mut o = orchestrator();
        let token = o.schedule(record(Zone::LeftHalf));
        o.on_timer_fired(token, &world);
        world.set_fail_place(true);
        assert_eq!(
            o.on_pick(wid(10), &world),
            AssistStep::Finished(FinishReason::Completed)
        );
    }

    #[test]
    fn missing_display_finishes() {
        let world = world(Zone::LeftHalf, 1);
        let mut o = orchestrator();
        let token = o.schedule(record(Zone::LeftHalf));
        world.remove_display(1);
        assert_eq!(
            o.on_timer_fired(token, &world),
            AssistStep::Finished(FinishReason::DisplayUnavailable)
        );
    }
}
