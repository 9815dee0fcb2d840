use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use snap_geom::FitTolerance;

use crate::{Error, Result};

/// Default delay between a snap and the assist picker.
pub const DEFAULT_ASSIST_DELAY_MS: u64 = 500;

/// Default minimum window dimension considered by occupancy analysis.
pub const DEFAULT_MIN_WINDOW_SIZE: f64 = 100.0;

/// Default size of a re-centered window with no remembered frame, as a
/// fraction of the usable area.
pub const DEFAULT_RESTORE_FRACTION: f64 = 0.6;

/// Upper bound on the assist delay; longer values are clamped.
const MAX_ASSIST_DELAY_MS: u64 = 10_000;

/// Tunables for snapping and snap assist.
///
/// Every field has a default, so a RON file only needs the fields it changes:
///
/// ```ron
/// (assist_delay_ms: 300, clean_fit: (position: 4.0, size: 16.0))
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Offer the assist picker after half and quarter snaps.
    pub assist_enabled: bool,
    /// Delay before the picker appears, in milliseconds.
    pub assist_delay_ms: u64,
    /// Tolerance for a clean snap (occupancy and candidate filtering).
    pub clean_fit: FitTolerance,
    /// Tolerance for recognising the frontmost window's current zone.
    pub state_fit: FitTolerance,
    /// Windows smaller than this on either axis are ignored.
    pub min_window_size: f64,
    /// App names whose windows are never counted or offered.
    pub skip_apps: Vec<String>,
    /// Size of a re-centered window with no remembered frame.
    pub restore_fraction: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            assist_enabled: true,
            assist_delay_ms: DEFAULT_ASSIST_DELAY_MS,
            clean_fit: FitTolerance::CLEAN_FIT,
            state_fit: FitTolerance::STATE_DETECT,
            min_window_size: DEFAULT_MIN_WINDOW_SIZE,
            skip_apps: vec![
                "Dock".into(),
                "Window Server".into(),
                "Control Center".into(),
                "Spotlight".into(),
            ],
            restore_fraction: DEFAULT_RESTORE_FRACTION,
        }
    }
}

impl SnapConfig {
    /// Parse a RON document and sanitize the result.
    pub fn from_ron(src: &str) -> Result<Self> {
        let cfg: Self = ron::from_str(src).map_err(|e| Error::Config(e.to_string()))?;
        Ok(cfg.sanitized())
    }

    /// Load a RON file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path)?;
        Self::from_ron(&src)
    }

    /// Clamp out-of-range values instead of rejecting them.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.assist_delay_ms = self.assist_delay_ms.min(MAX_ASSIST_DELAY_MS);
        self.clean_fit = self.clean_fit.sanitized();
        self.state_fit = self.state_fit.sanitized();
        if !self.min_window_size.is_finite() || self.min_window_size < 0.0 {
            self.min_window_size = 0.0;
        }
        if !self.restore_fraction.is_finite() {
            self.restore_fraction = DEFAULT_RESTORE_FRACTION;
        }
        self.restore_fraction = self.restore_fraction.clamp(0.1, 1.0);
        self
    }

    /// Assist delay as a [`Duration`].
    pub fn assist_delay(&self) -> Duration {
        Duration::from_millis(self.assist_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let cfg = SnapConfig::from_ron("()").unwrap();
        assert_eq!(cfg, SnapConfig::default());
        assert_eq!(cfg.assist_delay(), Duration::from_millis(500));
    }

    #[test]
    fn partial_override() {
        let cfg = SnapConfig::from_ron(
            "(assist_delay_ms: 250, clean_fit: (position: 3.0, size: 12.0), skip_apps: [\"Snap\"])",
        )
        .unwrap();
        assert_eq!(cfg.assist_delay_ms, 250);
        assert_eq!(cfg.clean_fit.position, 3.0);
        assert_eq!(cfg.state_fit, FitTolerance::STATE_DETECT);
        assert_eq!(cfg.skip_apps, vec!["Snap".to_string()]);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let cfg = SnapConfig::from_ron(
            "(assist_delay_ms: 999999, min_window_size: -4.0, restore_fraction: 3.0, state_fit: (position: -1.0, size: 5.0))",
        )
        .unwrap();
        assert_eq!(cfg.assist_delay_ms, MAX_ASSIST_DELAY_MS);
        assert_eq!(cfg.min_window_size, 0.0);
        assert_eq!(cfg.restore_fraction, 1.0);
        assert_eq!(cfg.state_fit.position, 0.0);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(
            SnapConfig::from_ron("(assist_delay_ms: \"soon\")"),
            Err(Error::Config(_))
        ));
    }
}
