// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Marquee and logo video overlay properties.
//!
//! Each overlay property is a closed enum the engine interprets itself.
//! Positions are shared by both overlays and go through a fixed table of
//! names and engine-native values.

use std::{fmt, str::FromStr};

use crate::error::Error;

/// Integer-valued marquee properties, plus the text property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarqueeOption {
    Enable,
    Text,
    Color,
    Opacity,
    Position,
    Refresh,
    Size,
    Timeout,
    X,
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogoOption {
    Enable,
    File,
    X,
    Y,
    Delay,
    Repeat,
    Opacity,
    Position,
}

/// Overlay anchor within the video frame.
///
/// Raw values are bit flags: left = 1, right = 2, top = 4, bottom = 8, with
/// zero meaning centered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayPosition {
    Center,
    Left,
    Right,
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
}

const POSITIONS: [(OverlayPosition, &str, i32); 9] = [
    (OverlayPosition::Center, "center", 0),
    (OverlayPosition::Left, "left", 1),
    (OverlayPosition::Right, "right", 2),
    (OverlayPosition::Top, "top", 4),
    (OverlayPosition::TopLeft, "top-left", 5),
    (OverlayPosition::TopRight, "top-right", 6),
    (OverlayPosition::Bottom, "bottom", 8),
    (OverlayPosition::BottomLeft, "bottom-left", 9),
    (OverlayPosition::BottomRight, "bottom-right", 10),
];

impl OverlayPosition {
    pub fn name(self) -> &'static str {
        POSITIONS[self as usize].1
    }

    pub fn as_raw(self) -> i32 {
        POSITIONS[self as usize].2
    }

    pub fn from_raw(raw: i32) -> Option<Self> {
        POSITIONS
            .iter()
            .find(|(_, _, value)| *value == raw)
            .map(|(position, _, _)| *position)
    }
}

impl fmt::Display for OverlayPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OverlayPosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        POSITIONS
            .iter()
            .find(|(_, name, _)| *name == s)
            .map(|(position, _, _)| *position)
            .ok_or_else(|| Error::InvalidValue(format!("unknown overlay position: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_map_both_ways() {
        for (position, name, raw) in POSITIONS {
            assert_eq!(position.name(), name);
            assert_eq!(position.as_raw(), raw);
            assert_eq!(OverlayPosition::from_raw(raw), Some(position));
            assert_eq!(name.parse::<OverlayPosition>().unwrap(), position);
        }
    }

    #[test]
    fn unknown_positions_are_rejected() {
        assert!(matches!(
            "middle".parse::<OverlayPosition>(),
            Err(Error::InvalidValue(_))
        ));
        assert_eq!(OverlayPosition::from_raw(3), None);
        assert_eq!(OverlayPosition::from_raw(12), None);
    }
}
