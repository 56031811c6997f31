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

//! Marquee and logo overlay controls.
//!
//! Both are thin views borrowing the player's engine; they hold no state of
//! their own and can be created as often as needed.

use crate::{
    engine::PlaybackEngine,
    error::{Error, Result},
    model::overlay::{LogoOption, MarqueeOption, OverlayPosition},
};

/// Scrolling text overlay.
pub struct Marquee<'a, E: PlaybackEngine> {
    engine: &'a E,
}

impl<'a, E: PlaybackEngine> Marquee<'a, E> {
    pub(crate) fn new(engine: &'a E) -> Self {
        Self { engine }
    }

    pub fn enable(&self) -> Result<()> {
        self.engine.set_marquee_int(MarqueeOption::Enable, 1)
    }

    pub fn disable(&self) -> Result<()> {
        self.engine.set_marquee_int(MarqueeOption::Enable, 0)
    }

    /// The marquee text, `None` when unset.
    pub fn text(&self) -> Option<String> {
        self.engine
            .marquee_string(MarqueeOption::Text)
            .filter(|text| !text.is_empty())
    }

    pub fn set_text(&self, text: &str) -> Result<()> {
        self.engine.set_marquee_string(MarqueeOption::Text, text)
    }

    /// The anchor position, `None` if the engine reports an unknown value.
    pub fn position(&self) -> Option<OverlayPosition> {
        OverlayPosition::from_raw(self.engine.marquee_int(MarqueeOption::Position))
    }

    pub fn set_position(&self, position: OverlayPosition) -> Result<()> {
        self.engine
            .set_marquee_int(MarqueeOption::Position, position.as_raw())
    }

    /// Text colour as `0xRRGGBB`.
    pub fn color(&self) -> i32 {
        self.engine.marquee_int(MarqueeOption::Color)
    }

    pub fn set_color(&self, color: i32) -> Result<()> {
        self.engine.set_marquee_int(MarqueeOption::Color, color)
    }

    pub fn opacity(&self) -> i32 {
        self.engine.marquee_int(MarqueeOption::Opacity)
    }

    pub fn set_opacity(&self, opacity: i32) -> Result<()> {
        self.engine.set_marquee_int(MarqueeOption::Opacity, opacity)
    }

    /// Refresh period in milliseconds.
    pub fn refresh(&self) -> i32 {
        self.engine.marquee_int(MarqueeOption::Refresh)
    }

    pub fn set_refresh(&self, refresh_ms: i32) -> Result<()> {
        self.engine.set_marquee_int(MarqueeOption::Refresh, refresh_ms)
    }

    pub fn size(&self) -> i32 {
        self.engine.marquee_int(MarqueeOption::Size)
    }

    pub fn set_size(&self, size: i32) -> Result<()> {
        self.engine.set_marquee_int(MarqueeOption::Size, size)
    }

    /// Display timeout in milliseconds, 0 for no timeout.
    pub fn timeout(&self) -> i32 {
        self.engine.marquee_int(MarqueeOption::Timeout)
    }

    pub fn set_timeout(&self, timeout_ms: i32) -> Result<()> {
        self.engine.set_marquee_int(MarqueeOption::Timeout, timeout_ms)
    }

    pub fn x(&self) -> i32 {
        self.engine.marquee_int(MarqueeOption::X)
    }

    pub fn set_x(&self, x: i32) -> Result<()> {
        self.engine.set_marquee_int(MarqueeOption::X, x)
    }

    pub fn y(&self) -> i32 {
        self.engine.marquee_int(MarqueeOption::Y)
    }

    pub fn set_y(&self, y: i32) -> Result<()> {
        self.engine.set_marquee_int(MarqueeOption::Y, y)
    }
}

/// Image overlay.
pub struct Logo<'a, E: PlaybackEngine> {
    engine: &'a E,
}

impl<'a, E: PlaybackEngine> Logo<'a, E> {
    pub(crate) fn new(engine: &'a E) -> Self {
        Self { engine }
    }

    pub fn enable(&self) -> Result<()> {
        self.engine.set_logo_int(LogoOption::Enable, 1)
    }

    pub fn disable(&self) -> Result<()> {
        self.engine.set_logo_int(LogoOption::Enable, 0)
    }

    /// Sets the logo image, or an animation cycling through several images.
    pub fn set_files(&self, files: &[&str]) -> Result<()> {
        if files.is_empty() || files.iter().any(|file| file.is_empty()) {
            return Err(Error::InvalidValue("logo needs at least one file".to_string()));
        }

        self.engine.set_logo_string(LogoOption::File, &files.join(";"))
    }

    pub fn position(&self) -> Option<OverlayPosition> {
        OverlayPosition::from_raw(self.engine.logo_int(LogoOption::Position))
    }

    pub fn set_position(&self, position: OverlayPosition) -> Result<()> {
        self.engine
            .set_logo_int(LogoOption::Position, position.as_raw())
    }

    /// Per-image delay in milliseconds when animating.
    pub fn delay(&self) -> i32 {
        self.engine.logo_int(LogoOption::Delay)
    }

    pub fn set_delay(&self, delay_ms: i32) -> Result<()> {
        self.engine.set_logo_int(LogoOption::Delay, delay_ms)
    }

    /// Animation loop count, -1 for forever.
    pub fn repeat(&self) -> i32 {
        self.engine.logo_int(LogoOption::Repeat)
    }

    pub fn set_repeat(&self, repeat: i32) -> Result<()> {
        self.engine.set_logo_int(LogoOption::Repeat, repeat)
    }

    pub fn opacity(&self) -> i32 {
        self.engine.logo_int(LogoOption::Opacity)
    }

    pub fn set_opacity(&self, opacity: i32) -> Result<()> {
        self.engine.set_logo_int(LogoOption::Opacity, opacity)
    }

    pub fn x(&self) -> i32 {
        self.engine.logo_int(LogoOption::X)
    }

    pub fn set_x(&self, x: i32) -> Result<()> {
        self.engine.set_logo_int(LogoOption::X, x)
    }

    pub fn y(&self) -> i32 {
        self.engine.logo_int(LogoOption::Y)
    }

    pub fn set_y(&self, y: i32) -> Result<()> {
        self.engine.set_logo_int(LogoOption::Y, y)
    }
}
