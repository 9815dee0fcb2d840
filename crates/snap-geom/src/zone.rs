use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::{Rect, grid_cell_rect};

/// One of the nine canonical snap targets on a display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Left column of the 2×2 grid.
    LeftHalf,
    /// Right column of the 2×2 grid.
    RightHalf,
    /// Top row of the 2×2 grid.
    TopHalf,
    /// Bottom row of the 2×2 grid.
    BottomHalf,
    /// Top-left cell.
    TopLeftQuarter,
    /// Top-right cell.
    TopRightQuarter,
    /// Bottom-left cell.
    BottomLeftQuarter,
    /// Bottom-right cell.
    BottomRightQuarter,
    /// The whole usable area.
    Maximize,
}

/// Order in which empty quarters are offered for filling.
pub const QUARTER_PRIORITY: [Zone; 4] = [
    Zone::TopLeftQuarter,
    Zone::TopRightQuarter,
    Zone::BottomLeftQuarter,
    Zone::BottomRightQuarter,
];

impl Zone {
    /// Every zone, quarters first, then halves, then `Maximize`.
    pub const ALL: [Self; 9] = [
        Self::TopLeftQuarter,
        Self::TopRightQuarter,
        Self::BottomLeftQuarter,
        Self::BottomRightQuarter,
        Self::LeftHalf,
        Self::RightHalf,
        Self::TopHalf,
        Self::BottomHalf,
        Self::Maximize,
    ];

    /// The four halves.
    pub const HALVES: [Self; 4] = [Self::LeftHalf, Self::RightHalf, Self::TopHalf, Self::BottomHalf];

    /// True for the four halves.
    pub const fn is_half(self) -> bool {
        matches!(
            self,
            Self::LeftHalf | Self::RightHalf | Self::TopHalf | Self::BottomHalf
        )
    }

    /// True for the four quarters.
    pub const fn is_quarter(self) -> bool {
        matches!(
            self,
            Self::TopLeftQuarter
                | Self::TopRightQuarter
                | Self::BottomLeftQuarter
                | Self::BottomRightQuarter
        )
    }

    /// Complementary half; `None` for quarters and `Maximize`.
    pub const fn opposite_half(self) -> Option<Self> {
        match self {
            Self::LeftHalf => Some(Self::RightHalf),
            Self::RightHalf => Some(Self::LeftHalf),
            Self::TopHalf => Some(Self::BottomHalf),
            Self::BottomHalf => Some(Self::TopHalf),
            _ => None,
        }
    }

    /// The two quarters composing a half, in priority order.
    pub const fn quarters(self) -> Option<[Self; 2]> {
        match self {
            Self::LeftHalf => Some([Self::TopLeftQuarter, Self::BottomLeftQuarter]),
            Self::RightHalf => Some([Self::TopRightQuarter, Self::BottomRightQuarter]),
            Self::TopHalf => Some([Self::TopLeftQuarter, Self::TopRightQuarter]),
            Self::BottomHalf => Some([Self::BottomLeftQuarter, Self::BottomRightQuarter]),
            _ => None,
        }
    }

    /// The other quarter sharing this quarter's vertical (left/right) half.
    pub const fn sibling_quarter(self) -> Option<Self> {
        match self {
            Self::TopLeftQuarter => Some(Self::BottomLeftQuarter),
            Self::BottomLeftQuarter => Some(Self::TopLeftQuarter),
            Self::TopRightQuarter => Some(Self::BottomRightQuarter),
            Self::BottomRightQuarter => Some(Self::TopRightQuarter),
            _ => None,
        }
    }

    /// Halves that contain this quarter: its side half and its row half.
    pub const fn containing_halves(self) -> Option<[Self; 2]> {
        match self {
            Self::TopLeftQuarter => Some([Self::LeftHalf, Self::TopHalf]),
            Self::TopRightQuarter => Some([Self::RightHalf, Self::TopHalf]),
            Self::BottomLeftQuarter => Some([Self::LeftHalf, Self::BottomHalf]),
            Self::BottomRightQuarter => Some([Self::RightHalf, Self::BottomHalf]),
            _ => None,
        }
    }

    /// Grid span as `(col, row, cols_spanned, rows_spanned)` in the 2×2 grid.
    const fn span(self) -> (u32, u32, u32, u32) {
        match self {
            Self::TopLeftQuarter => (0, 0, 1, 1),
            Self::TopRightQuarter => (1, 0, 1, 1),
            Self::BottomLeftQuarter => (0, 1, 1, 1),
            Self::BottomRightQuarter => (1, 1, 1, 1),
            Self::LeftHalf => (0, 0, 1, 2),
            Self::RightHalf => (1, 0, 1, 2),
            Self::TopHalf => (0, 0, 2, 1),
            Self::BottomHalf => (0, 1, 2, 1),
            Self::Maximize => (0, 0, 2, 2),
        }
    }

    /// Rectangle for this zone within `usable` (screen bounds minus menu bar
    /// and dock). Halves are two merged grid cells, so sibling quarters tile
    /// their half exactly.
    pub fn rect(self, usable: Rect) -> Rect {
        let usable = usable.sanitized();
        let (col, row, cspan, rspan) = self.span();
        let first = grid_cell_rect(usable, 2, 2, col, row);
        let last = grid_cell_rect(usable, 2, 2, col + cspan - 1, row + rspan - 1);
        Rect {
            x: first.x,
            y: first.y,
            w: last.right() - first.left(),
            h: last.bottom() - first.top(),
        }
    }

    /// Lowercase config name, e.g. `"top-left"`.
    pub const fn to_spec(self) -> &'static str {
        match self {
            Self::LeftHalf => "left",
            Self::RightHalf => "right",
            Self::TopHalf => "top",
            Self::BottomHalf => "bottom",
            Self::TopLeftQuarter => "top-left",
            Self::TopRightQuarter => "top-right",
            Self::BottomLeftQuarter => "bottom-left",
            Self::BottomRightQuarter => "bottom-right",
            Self::Maximize => "maximize",
        }
    }

    /// Parse a name produced by [`Zone::to_spec`] (case-insensitive).
    pub fn from_spec(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|z| z.to_spec() == s)
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.to_spec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 800.0)
    }

    #[test]
    fn concrete_rects() {
        assert_eq!(Zone::LeftHalf.rect(area()), Rect::new(0.0, 0.0, 500.0, 800.0));
        assert_eq!(Zone::RightHalf.rect(area()), Rect::new(500.0, 0.0, 500.0, 800.0));
        assert_eq!(Zone::BottomHalf.rect(area()), Rect::new(0.0, 400.0, 1000.0, 400.0));
        assert_eq!(
            Zone::TopRightQuarter.rect(area()),
            Rect::new(500.0, 0.0, 500.0, 400.0)
        );
        assert_eq!(Zone::Maximize.rect(area()), area());
    }

    #[test]
    fn offset_usable_area() {
        // Menu bar inset of 25 and dock of 70 on the bottom.
        let usable = Rect::new(0.0, 25.0, 1440.0, 805.0);
        let br = Zone::BottomRightQuarter.rect(usable);
        assert_eq!(br.right(), 1440.0);
        assert_eq!(br.bottom(), 830.0);
        assert_eq!(Zone::TopHalf.rect(usable).y, 25.0);
    }

    #[test]
    fn opposite_half_is_involution() {
        for h in Zone::HALVES {
            let opp = h.opposite_half().expect("half has opposite");
            assert_eq!(opp.opposite_half(), Some(h));
            assert_ne!(opp, h);
        }
        assert_eq!(Zone::Maximize.opposite_half(), None);
        assert_eq!(Zone::TopLeftQuarter.opposite_half(), None);
    }

    #[test]
    fn relationships_defined_only_for_their_kind() {
        for z in Zone::ALL {
            assert_eq!(z.quarters().is_some(), z.is_half(), "{z}");
            assert_eq!(z.sibling_quarter().is_some(), z.is_quarter(), "{z}");
            assert!(!(z.is_half() && z.is_quarter()));
        }
        assert!(!Zone::Maximize.is_half() && !Zone::Maximize.is_quarter());
    }

    #[test]
    fn sibling_shares_side_half() {
        for q in QUARTER_PRIORITY {
            let sib = q.sibling_quarter().expect("quarter");
            let side = q.containing_halves().expect("quarter")[0];
            assert!(side.quarters().expect("half").contains(&sib));
            assert_eq!(sib.sibling_quarter(), Some(q));
        }
    }

    #[test]
    fn spec_names_round_trip() {
        for z in Zone::ALL {
            assert_eq!(Zone::from_spec(z.to_spec()), Some(z));
        }
        assert_eq!(Zone::from_spec(" Top-Left "), Some(Zone::TopLeftQuarter));
        assert_eq!(Zone::from_spec("middle"), None);
    }

    #[test]
    fn zero_area_yields_zero_rects() {
        let empty = Rect::new(10.0, 10.0, 0.0, -5.0);
        for z in Zone::ALL {
            let r = z.rect(empty);
            assert!(r.w >= 0.0 && r.h >= 0.0, "{z}: {r:?}");
        }
    }
}
