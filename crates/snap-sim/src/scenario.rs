//! Scenario files: a desktop, its windows, and a script of user actions.
//!
//! ```ron
//! (
//!     usable: (x: 0.0, y: 25.0, w: 1440.0, h: 875.0),
//!     windows: [
//!         (id: (pid: 101, window_id: 1), app: "Editor", frame: (x: 200.0, y: 150.0, w: 700.0, h: 500.0)),
//!     ],
//!     steps: [Key(Left), Wait("600ms"), Pick((pid: 102, window_id: 2))],
//! )
//! ```

use std::{collections::HashSet, fs, path::Path, result::Result as StdResult, time::Duration};

use serde::{Deserialize, Deserializer, de};
use snap_engine::{SnapConfig, SnapDirection};
use snap_geom::{Rect, Zone};
use snap_world::{SimWindow, SimWorld, WindowId};

use crate::error::{Error, Result};

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum Step {
    /// Press an arrow key with the snap modifier.
    Key(SnapDirection),
    /// Let time pass, delivering any timer that comes due.
    Wait(#[serde(deserialize_with = "humantime_duration")] Duration),
    /// Choose a window in the picker.
    Pick(WindowId),
    /// Dismiss the picker.
    Dismiss,
    /// Close a window.
    Close(WindowId),
    /// Drag a window to a new frame.
    Move(WindowId, Rect),
    /// Snap a window by some other means (mouse drag).
    Snap(WindowId, Zone),
    /// Reconfigure displays.
    DisplayChanged,
}

/// Parse `"500ms"`, `"2s"` and friends.
fn humantime_duration<'de, D: Deserializer<'de>>(d: D) -> StdResult<Duration, D::Error> {
    let raw = String::deserialize(d)?;
    humantime::parse_duration(&raw).map_err(de::Error::custom)
}

/// A scripted desktop.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Usable area of the only display.
    pub usable: Rect,
    /// Windows, front to back.
    #[serde(default)]
    pub windows: Vec<SimWindow>,
    /// Snap configuration; defaults when omitted.
    #[serde(default)]
    pub config: Option<SnapConfig>,
    /// Script to replay.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Parse and validate a RON document.
    pub fn from_ron(src: &str) -> Result<Self> {
        let scenario: Self = ron::from_str(src)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_ron(&fs::read_to_string(path)?)
    }

    /// Reject scenarios the simulator cannot replay meaningfully.
    fn validate(&self) -> Result<()> {
        if self.usable.sanitized().is_empty() {
            return Err(Error::scenario("usable area is empty"));
        }
        let mut seen = HashSet::new();
        for w in &self.windows {
            if !seen.insert(w.id) {
                return Err(Error::scenario(format!("duplicate window id {}", w.id)));
            }
        }
        Ok(())
    }

    /// Effective configuration: `override_cfg` beats the embedded one.
    pub fn config_with(&self, override_cfg: Option<SnapConfig>) -> SnapConfig {
        override_cfg
            .or_else(|| self.config.clone())
            .unwrap_or_default()
            .sanitized()
    }

    /// Build the simulated desktop.
    pub fn world(&self) -> SimWorld {
        let world = SimWorld::with_display(self.usable);
        for w in &self.windows {
            world.push_back(w.clone());
        }
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = r#"(
        usable: (x: 0.0, y: 25.0, w: 1440.0, h: 875.0),
        windows: [
            (id: (pid: 101, window_id: 1), app: "Editor", frame: (x: 200.0, y: 150.0, w: 700.0, h: 500.0)),
            (id: (pid: 102, window_id: 2), app: "Browser", frame: (x: 300.0, y: 200.0, w: 800.0, h: 600.0)),
        ],
        config: Some((assist_delay_ms: 300)),
        steps: [Key(Left), Wait("600ms"), Pick((pid: 102, window_id: 2)), Snap((pid: 101, window_id: 1), TopLeftQuarter)],
    )"#;

    #[test]
    fn parses_steps_and_config() {
        let s = Scenario::from_ron(BASIC).unwrap();
        assert_eq!(s.windows.len(), 2);
        assert_eq!(s.config_with(None).assist_delay_ms, 300);
        assert_eq!(
            s.steps,
            vec![
                Step::Key(SnapDirection::Left),
                Step::Wait(Duration::from_millis(600)),
                Step::Pick(WindowId::new(102, 2)),
                Step::Snap(WindowId::new(101, 1), Zone::TopLeftQuarter),
            ]
        );
        let world = s.world();
        assert_eq!(world.windows()[0].app, "Editor");
    }

    #[test]
    fn cli_config_overrides_embedded() {
        let s = Scenario::from_ron(BASIC).unwrap();
        let cfg = s.config_with(Some(SnapConfig::default()));
        assert_eq!(cfg.assist_delay_ms, 500);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let src = r#"(
            usable: (x: 0.0, y: 0.0, w: 100.0, h: 100.0),
            windows: [
                (id: (pid: 1, window_id: 1), frame: (x: 0.0, y: 0.0, w: 10.0, h: 10.0)),
                (id: (pid: 1, window_id: 1), frame: (x: 0.0, y: 0.0, w: 10.0, h: 10.0)),
            ],
        )"#;
        assert!(matches!(Scenario::from_ron(src), Err(Error::Scenario(_))));
    }

    #[test]
    fn bad_duration_is_a_parse_error() {
        let src = r#"(usable: (x: 0.0, y: 0.0, w: 100.0, h: 100.0), steps: [Wait("soon")])"#;
        assert!(matches!(Scenario::from_ron(src), Err(Error::Parse(_))));
    }

    #[test]
    fn empty_desktop_rejected() {
        let src = "(usable: (x: 0.0, y: 0.0, w: 0.0, h: 100.0))";
        assert!(matches!(Scenario::from_ron(src), Err(Error::Scenario(_))));
    }
}
