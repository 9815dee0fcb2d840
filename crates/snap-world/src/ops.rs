use snap_geom::Rect;

use crate::{DisplayId, Result, WindowId, WindowObservation};

/// Trait abstraction over the host window system.
///
/// All calls are synchronous and treated as instantaneous. Mutations are
/// best-effort: callers confirm results by taking a fresh snapshot rather
/// than trusting the return value.
pub trait WindowOps: Send + Sync {
    /// Usable area of `display`: full bounds minus menu bar and dock insets.
    fn usable_area(&self, display: DisplayId) -> Result<Rect>;

    /// On-screen windows of `display`, front to back, current at call time.
    fn snapshot_windows(&self, display: DisplayId) -> Vec<WindowObservation>;

    /// The globally frontmost standard window, if any.
    fn frontmost_window(&self) -> Option<WindowObservation>;

    /// Move and resize a window.
    fn place_window(&self, id: WindowId, target: Rect) -> Result<()>;

    /// Activate the owning app and bring the window to the front.
    fn activate_and_raise(&self, id: WindowId) -> Result<()>;

    /// Minimize a window to the dock.
    fn minimize_window(&self, id: WindowId) -> Result<()>;
}
