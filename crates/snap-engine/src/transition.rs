//! Snap transition tables.
//!
//! One table per direction, keyed by the current state (including
//! [`SnapState::Unsnapped`]). The tables are immutable statics; lookups that
//! miss indicate a table construction bug and fall back to the direction's
//! natural starting action.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use snap_geom::{FitTolerance, Rect, Zone};
use tracing::error;

use SnapState::{Snapped, Unsnapped};
use Transition::{Minimize, ReturnToCenter, SnapTo};
use Zone::{
    BottomHalf, BottomLeftQuarter, BottomRightQuarter, LeftHalf, Maximize, RightHalf, TopHalf,
    TopLeftQuarter, TopRightQuarter,
};

use crate::SnapDirection;

/// Where the frontmost window currently sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapState {
    /// The window matches no zone.
    Unsnapped,
    /// The window matches this zone.
    Snapped(Zone),
}

impl SnapState {
    /// All ten states: `Unsnapped` followed by every zone.
    pub const ALL: [Self; 10] = [
        Self::Unsnapped,
        Self::Snapped(Zone::TopLeftQuarter),
        Self::Snapped(Zone::TopRightQuarter),
        Self::Snapped(Zone::BottomLeftQuarter),
        Self::Snapped(Zone::BottomRightQuarter),
        Self::Snapped(Zone::LeftHalf),
        Self::Snapped(Zone::RightHalf),
        Self::Snapped(Zone::TopHalf),
        Self::Snapped(Zone::BottomHalf),
        Self::Snapped(Zone::Maximize),
    ];

    /// The zone, if snapped.
    pub const fn zone(self) -> Option<Zone> {
        match self {
            Self::Unsnapped => None,
            Self::Snapped(z) => Some(z),
        }
    }
}

impl Display for SnapState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Unsnapped => f.write_str("unsnapped"),
            Self::Snapped(z) => write!(f, "{z}"),
        }
    }
}

/// Result of a directional key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// Snap the window to a zone.
    SnapTo(Zone),
    /// Un-snap: center the window at its remembered (or default) size.
    ReturnToCenter,
    /// Minimize the window.
    Minimize,
}

impl Display for Transition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::SnapTo(z) => write!(f, "snap({z})"),
            Self::ReturnToCenter => f.write_str("center"),
            Self::Minimize => f.write_str("minimize"),
        }
    }
}

/// One row of a direction table.
type Row = (SnapState, Transition);

/// Up climbs: quarter -> side half -> maximize. Never unsnaps or minimizes.
static UP: [Row; 10] = [
    (Unsnapped, SnapTo(Maximize)),
    (Snapped(Maximize), SnapTo(TopHalf)),
    (Snapped(TopHalf), SnapTo(TopHalf)),
    (Snapped(BottomHalf), SnapTo(Maximize)),
    (Snapped(LeftHalf), SnapTo(Maximize)),
    (Snapped(RightHalf), SnapTo(Maximize)),
    (Snapped(TopLeftQuarter), SnapTo(LeftHalf)),
    (Snapped(BottomLeftQuarter), SnapTo(LeftHalf)),
    (Snapped(TopRightQuarter), SnapTo(RightHalf)),
    (Snapped(BottomRightQuarter), SnapTo(RightHalf)),
];

/// Down descends quarter positions and gets the window out of the way.
static DOWN: [Row; 10] = [
    (Unsnapped, Minimize),
    (Snapped(Maximize), ReturnToCenter),
    (Snapped(TopHalf), ReturnToCenter),
    (Snapped(BottomHalf), ReturnToCenter),
    (Snapped(LeftHalf), SnapTo(BottomLeftQuarter)),
    (Snapped(RightHalf), SnapTo(BottomRightQuarter)),
    (Snapped(TopLeftQuarter), SnapTo(BottomLeftQuarter)),
    (Snapped(TopRightQuarter), SnapTo(BottomRightQuarter)),
    (Snapped(BottomLeftQuarter), Minimize),
    (Snapped(BottomRightQuarter), Minimize),
];

/// Left: the opposite half must un-snap before crossing over.
static LEFT: [Row; 10] = [
    (Unsnapped, SnapTo(LeftHalf)),
    (Snapped(Maximize), SnapTo(LeftHalf)),
    (Snapped(LeftHalf), SnapTo(LeftHalf)),
    (Snapped(RightHalf), ReturnToCenter),
    (Snapped(TopHalf), SnapTo(TopLeftQuarter)),
    (Snapped(BottomHalf), SnapTo(BottomLeftQuarter)),
    (Snapped(TopLeftQuarter), SnapTo(LeftHalf)),
    (Snapped(BottomLeftQuarter), SnapTo(LeftHalf)),
    (Snapped(TopRightQuarter), SnapTo(TopLeftQuarter)),
    (Snapped(BottomRightQuarter), SnapTo(BottomLeftQuarter)),
];

/// Mirror image of [`LEFT`].
static RIGHT: [Row; 10] = [
    (Unsnapped, SnapTo(RightHalf)),
    (Snapped(Maximize), SnapTo(RightHalf)),
    (Snapped(RightHalf), SnapTo(RightHalf)),
    (Snapped(LeftHalf), ReturnToCenter),
    (Snapped(TopHalf), SnapTo(TopRightQuarter)),
    (Snapped(BottomHalf), SnapTo(BottomRightQuarter)),
    (Snapped(TopRightQuarter), SnapTo(RightHalf)),
    (Snapped(BottomRightQuarter), SnapTo(RightHalf)),
    (Snapped(TopLeftQuarter), SnapTo(TopRightQuarter)),
    (Snapped(BottomLeftQuarter), SnapTo(BottomRightQuarter)),
];

/// Table for a direction.
fn table(direction: SnapDirection) -> &'static [Row] {
    match direction {
        SnapDirection::Up => &UP,
        SnapDirection::Down => &DOWN,
        SnapDirection::Left => &LEFT,
        SnapDirection::Right => &RIGHT,
    }
}

/// Raw table lookup; `None` means the table has a gap.
pub fn lookup(current: SnapState, direction: SnapDirection) -> Option<Transition> {
    table(direction)
        .iter()
        .find(|(state, _)| *state == current)
        .map(|(_, t)| *t)
}

/// Natural starting action for a direction, used if a table has a gap.
const fn fallback(direction: SnapDirection) -> Transition {
    match direction {
        SnapDirection::Up => SnapTo(Maximize),
        SnapDirection::Down => ReturnToCenter,
        SnapDirection::Left => SnapTo(LeftHalf),
        SnapDirection::Right => SnapTo(RightHalf),
    }
}

/// Next action for a key press in `direction` from `current`.
pub fn next_action(current: SnapState, direction: SnapDirection) -> Transition {
    match lookup(current, direction) {
        Some(t) => t,
        None => {
            error!(%current, %direction, "transition table gap");
            debug_assert!(false, "transition table gap: {current} / {direction}");
            fallback(direction)
        }
    }
}

/// Recognise which zone (if any) `frame` occupies within `usable`.
///
/// When several zones match (tiny displays), the closest one wins.
pub fn detect_state(frame: &Rect, usable: Rect, tol: FitTolerance) -> SnapState {
    Zone::ALL
        .into_iter()
        .filter_map(|z| {
            let target = z.rect(usable);
            tol.matches(frame, &target).then(|| {
                let (dp, ds) = frame.deviation(&target);
                (z, dp + ds)
            })
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(SnapState::Unsnapped, |(z, _)| SnapState::Snapped(z))
}
