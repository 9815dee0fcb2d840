//! snap-world: the boundary between the snapping core and the host window
//! system.
//!
//! The core never owns windows. It reasons over [`WindowObservation`] lists
//! captured at one instant (front-to-back z-order) and asks a [`WindowOps`]
//! implementation to mutate geometry. [`SimWorld`] is an in-memory
//! implementation used by the simulator and the test suites.
#![warn(missing_docs)]

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use snap_geom::Rect;

mod error;
mod ops;
mod sim;

pub use error::{Error, Result};
pub use ops::WindowOps;
pub use sim::{SimCall, SimWindow, SimWorld};

/// Identifier for a display.
pub type DisplayId = u32;

/// Window layer used by ordinary application windows.
pub const STANDARD_LAYER: i32 = 0;

/// Identifier for an on-screen window.
///
/// Couples the owning process id with the window server's window number so
/// callers always reference windows observed in a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId {
    /// Process identifier that owns the window.
    pid: i32,
    /// Window server window number.
    window_id: u32,
}

impl WindowId {
    /// Construct a new identifier using the owning process id and window id.
    #[must_use]
    pub const fn new(pid: i32, window_id: u32) -> Self {
        Self { pid, window_id }
    }

    /// Owning process id for this window.
    #[must_use]
    pub const fn pid(self) -> i32 {
        self.pid
    }

    /// Window server window number.
    #[must_use]
    pub const fn window_id(self) -> u32 {
        self.window_id
    }
}

impl From<(i32, u32)> for WindowId {
    fn from(value: (i32, u32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl Display for WindowId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}", self.pid, self.window_id)
    }
}

/// Read-only snapshot entry for one window.
///
/// The z-order rank is the entry's index in the snapshot list; `z` mirrors it
/// so observations stay self-describing once filtered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowObservation {
    /// Window identity.
    pub id: WindowId,
    /// Owning application name.
    pub app: String,
    /// Window title.
    pub title: String,
    /// Frame in global screen coordinates.
    pub frame: Rect,
    /// Window server layer; [`STANDARD_LAYER`] for normal app windows.
    pub layer: i32,
    /// Front-to-back rank within the snapshot (0 is frontmost).
    pub z: u32,
    /// Display the window is on.
    pub display_id: DisplayId,
}

impl WindowObservation {
    /// Owning process id.
    pub fn pid(&self) -> i32 {
        self.id.pid()
    }

    /// True for ordinary application windows.
    pub fn is_standard_layer(&self) -> bool {
        self.layer == STANDARD_LAYER
    }
}

/// Find a window by id in a snapshot.
pub fn find_window(snapshot: &[WindowObservation], id: WindowId) -> Option<&WindowObservation> {
    snapshot.iter().find(|w| w.id == id)
}
