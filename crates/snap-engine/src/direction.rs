use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// macOS virtual keycodes for the arrow keys (HIToolbox `kVK_*Arrow`).
const KEYCODE_LEFT: u16 = 0x7B;
const KEYCODE_RIGHT: u16 = 0x7C;
const KEYCODE_DOWN: u16 = 0x7D;
const KEYCODE_UP: u16 = 0x7E;

/// Direction of a snap key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapDirection {
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
}

impl SnapDirection {
    /// All directions.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Map an arrow-key virtual keycode to a direction.
    pub const fn from_keycode(code: u16) -> Option<Self> {
        match code {
            KEYCODE_LEFT => Some(Self::Left),
            KEYCODE_RIGHT => Some(Self::Right),
            KEYCODE_DOWN => Some(Self::Down),
            KEYCODE_UP => Some(Self::Up),
            _ => None,
        }
    }

    /// Virtual keycode of the arrow key for this direction.
    pub const fn keycode(self) -> u16 {
        match self {
            Self::Left => KEYCODE_LEFT,
            Self::Right => KEYCODE_RIGHT,
            Self::Down => KEYCODE_DOWN,
            Self::Up => KEYCODE_UP,
        }
    }

    /// Parse `"left"`, `"right"`, `"up"` or `"down"` (case-insensitive).
    pub fn from_spec(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }

    /// Lowercase name, the inverse of [`Self::from_spec`].
    pub const fn to_spec(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl Display for SnapDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.to_spec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keycodes_round_trip() {
        for d in SnapDirection::ALL {
            assert_eq!(SnapDirection::from_keycode(d.keycode()), Some(d));
        }
        assert_eq!(SnapDirection::from_keycode(0x7B), Some(SnapDirection::Left));
        assert_eq!(SnapDirection::from_keycode(0x00), None);
    }

    #[test]
    fn spec_parsing() {
        assert_eq!(SnapDirection::from_spec("Up"), Some(SnapDirection::Up));
        assert_eq!(SnapDirection::from_spec(" down "), Some(SnapDirection::Down));
        assert_eq!(SnapDirection::from_spec("sideways"), None);
    }
}
