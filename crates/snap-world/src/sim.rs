//! In-memory window system.
//!
//! `SimWorld` keeps a z-ordered window list per process and implements
//! [`WindowOps`] against it. The simulator binary loads scenarios into it,
//! and the engine test suites use it to observe placements.

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use snap_geom::Rect;
use tracing::trace;

use crate::{DisplayId, Error, Result, STANDARD_LAYER, WindowId, WindowObservation, WindowOps};

/// Default display used when a scenario does not name one.
const DEFAULT_DISPLAY: DisplayId = 1;

/// Window record held by [`SimWorld`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimWindow {
    /// Window identity.
    pub id: WindowId,
    /// Owning application name.
    #[serde(default)]
    pub app: String,
    /// Window title.
    #[serde(default)]
    pub title: String,
    /// Current frame.
    pub frame: Rect,
    /// Window server layer.
    #[serde(default)]
    pub layer: i32,
    /// Display the window lives on.
    #[serde(default = "default_display")]
    pub display_id: DisplayId,
    /// Minimized windows are not part of snapshots.
    #[serde(default)]
    pub minimized: bool,
}

/// Serde default for [`SimWindow::display_id`].
fn default_display() -> DisplayId {
    DEFAULT_DISPLAY
}

impl SimWindow {
    /// A standard-layer window on the default display.
    pub fn new(id: WindowId, app: &str, frame: Rect) -> Self {
        Self {
            id,
            app: app.to_string(),
            title: format!("{app} window"),
            frame,
            layer: STANDARD_LAYER,
            display_id: DEFAULT_DISPLAY,
            minimized: false,
        }
    }
}

/// Operation recorded by [`SimWorld`].
#[derive(Clone, Debug, PartialEq)]
pub enum SimCall {
    /// `place_window` was requested.
    Place(WindowId, Rect),
    /// `activate_and_raise` was requested.
    Raise(WindowId),
    /// `minimize_window` was requested.
    Minimize(WindowId),
}

/// Shared in-memory window system.
#[derive(Clone, Default)]
pub struct SimWorld {
    /// Usable area per display.
    displays: Arc<Mutex<BTreeMap<DisplayId, Rect>>>,
    /// Windows, front to back.
    windows: Arc<Mutex<Vec<SimWindow>>>,
    /// Mutations requested through [`WindowOps`].
    calls: Arc<Mutex<Vec<SimCall>>>,
    /// When set, `place_window` fails without moving anything.
    fail_place: Arc<AtomicBool>,
}

impl SimWorld {
    /// Empty world with no displays.
    pub fn new() -> Self {
        Self::default()
    }

    /// World with a single display whose usable area is `usable`.
    pub fn with_display(usable: Rect) -> Self {
        let world = Self::new();
        world.set_display(DEFAULT_DISPLAY, usable);
        world
    }

    /// Add or replace a display.
    pub fn set_display(&self, id: DisplayId, usable: Rect) {
        self.displays.lock().insert(id, usable);
    }

    /// Disconnect a display.
    pub fn remove_display(&self, id: DisplayId) {
        self.displays.lock().remove(&id);
    }

    /// Insert a window at the front of the z-order.
    pub fn push_front(&self, win: SimWindow) {
        self.windows.lock().insert(0, win);
    }

    /// Insert a window at the back of the z-order.
    pub fn push_back(&self, win: SimWindow) {
        self.windows.lock().push(win);
    }

    /// Close a window.
    pub fn remove_window(&self, id: WindowId) -> bool {
        let mut wins = self.windows.lock();
        let before = wins.len();
        wins.retain(|w| w.id != id);
        wins.len() != before
    }

    /// Move a window without recording a call (simulates the user dragging).
    pub fn set_frame(&self, id: WindowId, frame: Rect) {
        if let Some(w) = self.windows.lock().iter_mut().find(|w| w.id == id) {
            w.frame = frame;
        }
    }

    /// Move a window to another display, keeping its frame.
    pub fn set_display_of(&self, id: WindowId, display: DisplayId) {
        if let Some(w) = self.windows.lock().iter_mut().find(|w| w.id == id) {
            w.display_id = display;
        }
    }

    /// Current frame of a window.
    pub fn frame_of(&self, id: WindowId) -> Option<Rect> {
        self.windows
            .lock()
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.frame)
    }

    /// Copy of all windows, front to back.
    pub fn windows(&self) -> Vec<SimWindow> {
        self.windows.lock().clone()
    }

    /// Copy of the recorded calls.
    pub fn calls(&self) -> Vec<SimCall> {
        self.calls.lock().clone()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Make subsequent `place_window` calls fail.
    pub fn set_fail_place(&self, v: bool) {
        self.fail_place.store(v, Ordering::SeqCst);
    }

    /// Record a call.
    fn note(&self, call: SimCall) {
        trace!(?call, "sim_call");
        self.calls.lock().push(call);
    }

    /// Convert a window to an observation with rank `z`.
    fn observe(w: &SimWindow, z: usize) -> WindowObservation {
        WindowObservation {
            id: w.id,
            app: w.app.clone(),
            title: w.title.clone(),
            frame: w.frame,
            layer: w.layer,
            z: u32::try_from(z).unwrap_or(u32::MAX),
            display_id: w.display_id,
        }
    }
}

impl WindowOps for SimWorld {
    fn usable_area(&self, display: DisplayId) -> Result<Rect> {
        self.displays
            .lock()
            .get(&display)
            .copied()
            .ok_or(Error::DisplayUnavailable(display))
    }

    fn snapshot_windows(&self, display: DisplayId) -> Vec<WindowObservation> {
        self.windows
            .lock()
            .iter()
            .filter(|w| !w.minimized && w.display_id == display)
            .enumerate()
            .map(|(z, w)| Self::observe(w, z))
            .collect()
    }

    fn frontmost_window(&self) -> Option<WindowObservation> {
        self.windows
            .lock()
            .iter()
            .filter(|w| !w.minimized)
            .enumerate()
            .find(|(_, w)| w.layer == STANDARD_LAYER)
            .map(|(z, w)| Self::observe(w, z))
    }

    fn place_window(&self, id: WindowId, target: Rect) -> Result<()> {
        self.note(SimCall::Place(id, target));
        if self.fail_place.load(Ordering::SeqCst) {
            return Err(Error::Backend("placement refused".into()));
        }
        let mut wins = self.windows.lock();
        let w = wins
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(Error::WindowGone(id))?;
        w.frame = target;
        w.minimized = false;
        Ok(())
    }

    fn activate_and_raise(&self, id: WindowId) -> Result<()> {
        self.note(SimCall::Raise(id));
        let mut wins = self.windows.lock();
        let idx = wins
            .iter()
            .position(|w| w.id == id)
            .ok_or(Error::WindowGone(id))?;
        let mut w = wins.remove(idx);
        w.minimized = false;
        wins.insert(0, w);
        Ok(())
    }

    fn minimize_window(&self, id: WindowId) -> Result<()> {
        self.note(SimCall::Minimize(id));
        let mut wins = self.windows.lock();
        let w = wins
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(Error::WindowGone(id))?;
        w.minimized = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wid(n: u32) -> WindowId {
        WindowId::new(100 + n as i32, n)
    }

    fn world() -> SimWorld {
        let w = SimWorld::with_display(Rect::new(0.0, 0.0, 1000.0, 800.0));
        w.push_back(SimWindow::new(wid(1), "A", Rect::new(0.0, 0.0, 300.0, 300.0)));
        w.push_back(SimWindow::new(wid(2), "B", Rect::new(50.0, 50.0, 300.0, 300.0)));
        w
    }

    #[test]
    fn snapshot_is_front_to_back() {
        let w = world();
        let snap = w.snapshot_windows(1);
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].id, wid(1));
        assert_eq!(snap[1].z, 1);
        assert!(w.snapshot_windows(2).is_empty());
    }

    #[test]
    fn raise_reorders_and_place_moves() {
        let w = world();
        w.activate_and_raise(wid(2)).unwrap();
        assert_eq!(w.frontmost_window().unwrap().id, wid(2));
        let target = Rect::new(500.0, 0.0, 500.0, 800.0);
        w.place_window(wid(1), target).unwrap();
        assert_eq!(w.frame_of(wid(1)), Some(target));
        assert_eq!(w.calls().len(), 2);
    }

    #[test]
    fn minimized_windows_leave_snapshots() {
        let w = world();
        w.minimize_window(wid(1)).unwrap();
        assert_eq!(w.frontmost_window().unwrap().id, wid(2));
        assert_eq!(w.snapshot_windows(1).len(), 1);
    }

    #[test]
    fn failures_are_reported() {
        let w = world();
        assert!(matches!(
            w.place_window(wid(9), Rect::default()),
            Err(Error::WindowGone(_))
        ));
        w.set_fail_place(true);
        assert!(matches!(
            w.place_window(wid(1), Rect::default()),
            Err(Error::Backend(_))
        ));
        assert!(matches!(w.usable_area(7), Err(Error::DisplayUnavailable(7))));
    }
}
