//! snap-geom: screen geometry for keyboard window snapping.
//!
//! - [`Rect`]: an axis-aligned rectangle in global screen coordinates
//!   (origin at the top-left of the primary display, `y` grows downward).
//! - [`Zone`]: the nine canonical snap targets and their relationships.
//! - [`FitTolerance`]: position/size slack used when matching a window frame
//!   against a zone rectangle.
//!
//! Everything here is pure arithmetic. Zone rectangles are always derived on
//! demand from a usable area and never cached.

mod rect;
mod tolerance;
mod zone;

#[cfg(test)]
mod property_tests;

pub use rect::{Rect, approx_eq, grid_cell_rect, overlap_1d};
pub use tolerance::FitTolerance;
pub use zone::{QUARTER_PRIORITY, Zone};
