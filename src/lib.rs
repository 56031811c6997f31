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

//! # Media list player.
//!
//! A playlist coordinator for an external media playback engine.
//!
//! The crate does no decoding or rendering. It keeps an ordered list of
//! media items and makes sure exactly one of them is active in a
//! [`PlaybackEngine`], exposing list mutation, transport controls and
//! pass-through access to the engine's playback state.
//!
//! ## Architecture
//!
//! * [`player::PlaylistPlayer`] owns the media list and the engine, and
//!   derives the active index from the engine's current media rather than
//!   tracking a cursor of its own.
//! * [`engine::PlaybackEngine`] is the capability interface an engine
//!   implements. With the `mpv` feature, [`engine::mpv::MpvEngine`] drives
//!   libmpv from a background worker thread.
//! * [`events`] delivers engine events to registered listeners on a
//!   dedicated dispatcher thread.
//!
//! ```no_run
//! # use media_list_player::{PlaybackEngine, PlaylistPlayer, Result};
//! # fn demo<E: PlaybackEngine>(engine: E) -> Result<()> {
//! let player = PlaylistPlayer::open(engine)?;
//!
//! player.add_item("a.mp4", &[])?;
//! player.add_item("b.mp4", &[":start-time=30".to_string()])?;
//!
//! player.play()?;
//! player.next()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod model;
pub mod player;

pub use config::PlayerConfig;
pub use engine::PlaybackEngine;
pub use error::{Error, Result};
pub use events::{EventKind, ListenerId, PlayerEvent};
pub use model::{MediaId, MediaItem, MetaKey, PlaybackMode, PlayerState, TrackDescription};
pub use player::{PlaylistPlayer, track_index_for_id};
