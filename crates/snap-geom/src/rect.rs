//! Rectangle primitives and grid helpers.
//! Coordinates follow the global CoreGraphics convention: top-left origin, y down.

use serde::{Deserialize, Serialize};

/// Compare two scalars with an absolute tolerance.
#[inline]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Length of the overlap between the intervals `[a1, a2]` and `[b1, b2]`.
#[inline]
pub fn overlap_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    let l = a1.max(b1);
    let r = a2.min(b2);
    (r - l).max(0.0)
}

/// Axis-aligned rectangle in screen points.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Construct a rectangle from origin and size.
    #[inline]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Return a copy with non-finite components zeroed and negative sizes
    /// clamped to zero, so downstream arithmetic never sees NaN or inverted
    /// geometry.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            x: finite(self.x),
            y: finite(self.y),
            w: finite(self.w).max(0.0),
            h: finite(self.h).max(0.0),
        }
    }

    /// Left edge.
    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }
    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }
    /// Top edge.
    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }
    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
    /// Horizontal centre.
    #[inline]
    pub fn cx(&self) -> f64 {
        self.x + self.w / 2.0
    }
    /// Vertical centre.
    #[inline]
    pub fn cy(&self) -> f64 {
        self.y + self.h / 2.0
    }

    /// Area, zero for degenerate rectangles.
    #[inline]
    pub fn area(&self) -> f64 {
        self.w.max(0.0) * self.h.max(0.0)
    }

    /// True when either dimension is zero (or negative).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Overlap of `self` and `other` along each axis.
    #[inline]
    pub fn overlap(&self, other: &Self) -> (f64, f64) {
        (
            overlap_1d(self.left(), self.right(), other.left(), other.right()),
            overlap_1d(self.top(), self.bottom(), other.top(), other.bottom()),
        )
    }

    /// Area shared by `self` and `other`.
    #[inline]
    pub fn intersection_area(&self, other: &Self) -> f64 {
        let (ox, oy) = self.overlap(other);
        ox * oy
    }

    /// True when the rectangles overlap by more than `margin` on both axes.
    ///
    /// Snapped neighbours may bleed into each other by a few points; a margin
    /// equal to the fit tolerance keeps those from counting as intersections.
    #[inline]
    pub fn intersects_beyond(&self, other: &Self, margin: f64) -> bool {
        let (ox, oy) = self.overlap(other);
        ox > margin && oy > margin
    }

    /// Largest absolute difference between origins and between sizes.
    #[inline]
    pub fn deviation(&self, other: &Self) -> (f64, f64) {
        let dp = (self.x - other.x).abs().max((self.y - other.y).abs());
        let ds = (self.w - other.w).abs().max((self.h - other.h).abs());
        (dp, ds)
    }

    /// Rectangle of size `w`×`h` centered within `self`, clamped to fit.
    #[must_use]
    pub fn centered(&self, w: f64, h: f64) -> Self {
        let w = w.clamp(0.0, self.w.max(0.0));
        let h = h.clamp(0.0, self.h.max(0.0));
        Self {
            x: self.x + (self.w - w) / 2.0,
            y: self.y + (self.h - h) / 2.0,
            w,
            h,
        }
    }
}

/// Rectangle of cell `(col, row)` in a `cols`×`rows` grid over `area`.
///
/// Tiles are floored to whole points; the last column and row absorb the
/// remainder so the cells partition `area` exactly. Degenerate areas yield
/// zero-sized cells rather than negative geometry.
pub fn grid_cell_rect(area: Rect, cols: u32, rows: u32, col: u32, row: u32) -> Rect {
    let area = area.sanitized();
    let cols = cols.max(1);
    let rows = rows.max(1);
    let col = col.min(cols - 1);
    let row = row.min(rows - 1);
    let tile_w = (area.w / f64::from(cols)).floor();
    let tile_h = (area.h / f64::from(rows)).floor();
    let rem_w = area.w - tile_w * f64::from(cols);
    let rem_h = area.h - tile_h * f64::from(rows);

    let x = area.x + tile_w * f64::from(col);
    let w = if col == cols - 1 { tile_w + rem_w } else { tile_w };
    let y = area.y + tile_h * f64::from(row);
    let h = if row == rows - 1 { tile_h + rem_h } else { tile_h };
    Rect { x, y, w, h }
}
