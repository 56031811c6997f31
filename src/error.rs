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

//! Error types for the playlist coordinator and its engines.
//!
//! Per-call failures (a bad index, an unresolvable location, a value the
//! engine rejects) are reported to the immediate caller and leave the player
//! state untouched. [`Error::EngineUnavailable`] is the only failure that
//! prevents a player from being opened at all.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The playback engine could not be bound.
    #[error("Playback engine is not available")]
    EngineUnavailable,

    /// A media location could not be turned into a playable item.
    #[error("Invalid media location: {0}")]
    InvalidLocation(String),

    /// A list index outside `0..len`.
    #[error("Index {index} out of range for playlist of {len} item(s)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A value rejected before reaching the engine, e.g. an unknown overlay
    /// position name or an out-of-range volume.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// The engine has no equivalent for the requested control.
    #[error("Not supported by this engine: {0}")]
    Unsupported(&'static str),

    /// The engine rejected or failed a request.
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Configuration error: {0}")]
    Config(#[from] confy::ConfyError),
}

pub type Result<T> = std::result::Result<T, Error>;
