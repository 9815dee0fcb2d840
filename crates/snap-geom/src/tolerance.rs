use serde::{Deserialize, Serialize};

use crate::Rect;

/// Slack allowed when deciding whether a window frame "is" a zone.
///
/// Origins and sizes are compared separately: window servers round sizes to
/// content increments (terminals, editors) far more than they shift origins.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitTolerance {
    /// Maximum difference in x or y, in points.
    pub position: f64,
    /// Maximum difference in width or height, in points.
    pub size: f64,
}

impl FitTolerance {
    /// Tight tolerance for a clean snap, used by occupancy analysis.
    pub const CLEAN_FIT: Self = Self {
        position: 5.0,
        size: 20.0,
    };

    /// Looser tolerance used to recognise the frontmost window's current zone.
    pub const STATE_DETECT: Self = Self {
        position: 10.0,
        size: 20.0,
    };

    /// Clamp both components to finite, non-negative values.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let clean = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            position: clean(self.position),
            size: clean(self.size),
        }
    }

    /// True when `frame` matches `target` within this tolerance.
    pub fn matches(&self, frame: &Rect, target: &Rect) -> bool {
        let (dp, ds) = frame.deviation(target);
        dp <= self.position && ds <= self.size
    }
}

impl Default for FitTolerance {
    fn default() -> Self {
        Self::CLEAN_FIT
    }
}
