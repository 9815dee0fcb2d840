//! Screen occupancy analysis.
//!
//! A zone is *filled* when, scanning the snapshot front to back, some
//! countable window matches the zone's rectangle within the clean-fit
//! tolerance and no visible window in front of it intersects the zone.
//! Occluders are not subject to the minimum size: a small panel on top of a
//! snapped window still hides part of it. Overlaps no deeper than the
//! clean-fit position tolerance on either axis are neighbour bleed, not
//! occlusion.
//! Snapshots are borrowed for the duration of a call and never retained.

use snap_geom::{FitTolerance, QUARTER_PRIORITY, Rect, Zone};
use snap_world::{WindowId, WindowObservation};
use tracing::trace;

use crate::SnapConfig;

/// Decides which zones are cleanly filled and which windows are still
/// worth offering.
#[derive(Clone, Debug)]
pub struct OccupancyAnalyzer {
    /// Clean-fit tolerance.
    tolerance: FitTolerance,
    /// Windows smaller than this on either axis are ignored.
    min_window_size: f64,
    /// Apps whose windows never count (our own UI, Dock, ...).
    skip_apps: Vec<String>,
}

impl OccupancyAnalyzer {
    /// Build an analyzer from configuration.
    pub fn new(cfg: &SnapConfig) -> Self {
        Self {
            tolerance: cfg.clean_fit,
            min_window_size: cfg.min_window_size,
            skip_apps: cfg.skip_apps.clone(),
        }
    }

    /// The clean-fit tolerance in use.
    pub fn tolerance(&self) -> FitTolerance {
        self.tolerance
    }

    /// True when `w` takes part in occupancy: standard layer, big enough, not
    /// owned by a skipped app or by `exclude_pid`.
    pub fn counts(&self, w: &WindowObservation, exclude_pid: Option<i32>) -> bool {
        w.is_standard_layer()
            && exclude_pid != Some(w.pid())
            && w.frame.w >= self.min_window_size
            && w.frame.h >= self.min_window_size
            && !self.skip_apps.iter().any(|a| a == &w.app)
    }

    /// True when `w` can hide what is behind it. Like [`Self::counts`] but
    /// without the size floor.
    pub fn can_occlude(&self, w: &WindowObservation, exclude_pid: Option<i32>) -> bool {
        w.is_standard_layer()
            && exclude_pid != Some(w.pid())
            && !self.skip_apps.iter().any(|a| a == &w.app)
    }

    /// True when a visible window in front of `idx` intersects `region`.
    fn occluded_before(
        &self,
        idx: usize,
        region: &Rect,
        snapshot: &[WindowObservation],
        exclude_pid: Option<i32>,
    ) -> bool {
        snapshot[..idx].iter().any(|w| {
            self.can_occlude(w, exclude_pid)
                && w.frame.intersects_beyond(region, self.tolerance.position)
        })
    }

    /// Index of the window that cleanly fills `zone`, if any.
    pub fn filler_index(
        &self,
        zone: Zone,
        usable: Rect,
        snapshot: &[WindowObservation],
        exclude_pid: Option<i32>,
    ) -> Option<usize> {
        let target = zone.rect(usable);
        if target.is_empty() {
            return None;
        }
        let idx = snapshot
            .iter()
            .position(|w| self.counts(w, exclude_pid) && self.tolerance.matches(&w.frame, &target))?;
        if self.occluded_before(idx, &target, snapshot, exclude_pid) {
            trace!(%zone, window = %snapshot[idx].id, "exact fit is occluded");
            return None;
        }
        Some(idx)
    }

    /// Exact fit plus unoccluded.
    pub fn is_zone_filled(
        &self,
        zone: Zone,
        usable: Rect,
        snapshot: &[WindowObservation],
        exclude_pid: Option<i32>,
    ) -> bool {
        self.filler_index(zone, usable, snapshot, exclude_pid).is_some()
    }

    /// Zones still worth filling after a snap to `just_snapped`, in the order
    /// they should be offered.
    ///
    /// After a half snap the opposite half is offered whole if it is
    /// completely empty, otherwise only its unfilled quarters. After a
    /// quarter snap, unfilled quarters are offered except those inside a
    /// half that is otherwise fully filled.
    pub fn zones_needing_fill(
        &self,
        just_snapped: Zone,
        usable: Rect,
        snapshot: &[WindowObservation],
    ) -> Vec<Zone> {
        if !(just_snapped.is_half() || just_snapped.is_quarter()) {
            return Vec::new();
        }
        let filled =
            |z: Zone| z == just_snapped || self.is_zone_filled(z, usable, snapshot, None);
        let half_filled = |h: Zone| {
            filled(h) || h.quarters().is_some_and(|qs| qs.into_iter().all(&filled))
        };

        if filled(Zone::Maximize)
            || (half_filled(Zone::LeftHalf) && half_filled(Zone::RightHalf))
            || (half_filled(Zone::TopHalf) && half_filled(Zone::BottomHalf))
        {
            return Vec::new();
        }

        if let Some(opposite) = just_snapped.opposite_half() {
            let Some(quarters) = opposite.quarters() else {
                return Vec::new();
            };
            if quarters.iter().all(|q| !filled(*q)) {
                return vec![opposite];
            }
            return QUARTER_PRIORITY
                .into_iter()
                .filter(|q| quarters.contains(q) && !filled(*q))
                .collect();
        }

        QUARTER_PRIORITY
            .into_iter()
            .filter(|q| !filled(*q))
            .filter(|q| {
                q.containing_halves()
                    .is_none_or(|hs| !hs.into_iter().any(&half_filled))
            })
            .collect()
    }

    /// True when the window at `idx` cleanly and visibly occupies some zone
    /// other than `except`.
    pub fn is_settled(
        &self,
        idx: usize,
        usable: Rect,
        snapshot: &[WindowObservation],
        except: Option<Zone>,
    ) -> bool {
        let Some(w) = snapshot.get(idx) else {
            return false;
        };
        Zone::ALL.into_iter().filter(|z| Some(*z) != except).any(|z| {
            let target = z.rect(usable);
            !target.is_empty()
                && self.tolerance.matches(&w.frame, &target)
                && !self.occluded_before(idx, &target, snapshot, None)
        })
    }

    /// Windows to offer for `active`, front to back.
    ///
    /// Excludes `excluded` ids (the snapped window and windows already placed
    /// in this sequence), non-countable windows, and windows settled
    /// unoccluded in another zone. A clean fit that is covered by something
    /// else is still offered.
    pub fn candidates(
        &self,
        active: Zone,
        usable: Rect,
        snapshot: &[WindowObservation],
        excluded: &[WindowId],
    ) -> Vec<WindowObservation> {
        snapshot
            .iter()
            .enumerate()
            .filter(|(_, w)| self.counts(w, None) && !excluded.contains(&w.id))
            .filter(|(i, _)| !self.is_settled(*i, usable, snapshot, Some(active)))
            .map(|(_, w)| w.clone())
            .collect()
    }
}
