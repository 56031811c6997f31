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

//! Domain models and core data structures.
//!
//! This module defines the plain data shared between the coordinator and the
//! playback engines: playlist entries, track descriptions, metadata keys and
//! the engine-reported playback state.

pub mod overlay;

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::error::{Error, Result};

static NEXT_MEDIA_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`MediaItem`].
///
/// Engines report their current media by id, which is how the coordinator
/// finds the active entry in its list without keeping a cursor of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaId(u64);

impl MediaId {
    fn next() -> Self {
        Self(NEXT_MEDIA_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "media#{}", self.0)
    }
}

/// One playlist entry: a location plus the one-shot options attached when it
/// was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    id: MediaId,
    location: String,
    options: Vec<String>,
}

impl MediaItem {
    /// Creates an item for `location`, minting a fresh [`MediaId`].
    ///
    /// The location itself is opaque; only obviously unusable values are
    /// rejected here (blank, embedded NUL, or a malformed `scheme://` prefix).
    /// Engines get a second look through
    /// [`PlaybackEngine::validate_location`](crate::engine::PlaybackEngine::validate_location).
    pub fn from_location(location: &str, options: &[String]) -> Result<Self> {
        let location = location.trim();

        if location.is_empty() {
            return Err(Error::InvalidLocation("empty location".to_string()));
        }

        if location.contains('\0') {
            return Err(Error::InvalidLocation(format!(
                "embedded NUL in {:?}",
                location
            )));
        }

        if let Some((scheme, _)) = location.split_once("://") {
            if !is_valid_scheme(scheme) {
                return Err(Error::InvalidLocation(format!(
                    "malformed scheme in {}",
                    location
                )));
            }
        }

        Ok(Self {
            id: MediaId::next(),
            location: location.to_string(),
            options: options.to_vec(),
        })
    }

    pub fn id(&self) -> MediaId {
        self.id
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }
}

// RFC 3986: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// A selectable audio, subtitle, title or chapter stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDescription {
    /// Engine-native identifier.
    pub id: i32,
    pub name: String,
}

impl TrackDescription {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Engine-reported playback state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    NothingSpecial,
    Opening,
    Buffering,
    Playing,
    Paused,
    Stopped,
    Ended,
    Error,
}

impl PlayerState {
    /// Whether the current media is still open in the engine, so that
    /// resuming it does not require loading it again.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            PlayerState::Opening
                | PlayerState::Buffering
                | PlayerState::Playing
                | PlayerState::Paused
        )
    }
}

/// What the coordinator does when the current item reaches its end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    /// Advance to the next item, stop after the last one.
    #[default]
    Default,
    /// Advance, wrapping from the last item back to the first.
    Loop,
    /// Replay the current item.
    Repeat,
}

/// Audio channel routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioChannel {
    Stereo,
    ReverseStereo,
    Left,
    Right,
    Dolby,
}


/// Descriptive tags that can be queried for the loaded media.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetaKey {
    Title,
    Artist,
    Genre,
    Copyright,
    Album,
    TrackNumber,
    Description,
    Rating,
    Date,
    Setting,
    Url,
    Language,
    NowPlaying,
    Publisher,
    EncodedBy,
    ArtworkUrl,
    TrackId,
}

impl MetaKey {
    pub const ALL: [MetaKey; 17] = [
        MetaKey::Title,
        MetaKey::Artist,
        MetaKey::Genre,
        MetaKey::Copyright,
        MetaKey::Album,
        MetaKey::TrackNumber,
        MetaKey::Description,
        MetaKey::Rating,
        MetaKey::Date,
        MetaKey::Setting,
        MetaKey::Url,
        MetaKey::Language,
        MetaKey::NowPlaying,
        MetaKey::Publisher,
        MetaKey::EncodedBy,
        MetaKey::ArtworkUrl,
        MetaKey::TrackId,
    ];

    /// The property name scripting hosts use for this key.
    pub fn name(self) -> &'static str {
        match self {
            MetaKey::Title => "title",
            MetaKey::Artist => "artist",
            MetaKey::Genre => "genre",
            MetaKey::Copyright => "copyright",
            MetaKey::Album => "album",
            MetaKey::TrackNumber => "trackNumber",
            MetaKey::Description => "description",
            MetaKey::Rating => "rating",
            MetaKey::Date => "date",
            MetaKey::Setting => "setting",
            MetaKey::Url => "URL",
            MetaKey::Language => "language",
            MetaKey::NowPlaying => "nowPlaying",
            MetaKey::Publisher => "publisher",
            MetaKey::EncodedBy => "encodedBy",
            MetaKey::ArtworkUrl => "artworkURL",
            MetaKey::TrackId => "trackID",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        MetaKey::ALL.into_iter().find(|key| key.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_ids_are_unique() {
        let a = MediaItem::from_location("a.mp4", &[]).unwrap();
        let b = MediaItem::from_location("a.mp4", &[]).unwrap();

        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn accepts_paths_and_urls() {
        for location in [
            "a.mp4",
            "/srv/media/movie.mkv",
            "file:///srv/media/movie.mkv",
            "http://example.org/stream.ts",
            "v4l2+x://dev",
        ] {
            assert!(
                MediaItem::from_location(location, &[]).is_ok(),
                "{location} rejected"
            );
        }
    }

    #[test]
    fn rejects_unusable_locations() {
        for location in ["", "   ", "://nothing", "1http://x", "ht tp://x", "a\0b"] {
            assert!(
                matches!(
                    MediaItem::from_location(location, &[]),
                    Err(Error::InvalidLocation(_))
                ),
                "{location:?} accepted"
            );
        }
    }

    #[test]
    fn keeps_options() {
        let options = vec![":start-time=10".to_string(), ":no-audio".to_string()];
        let item = MediaItem::from_location(" a.mp4 ", &options).unwrap();

        assert_eq!(item.location(), "a.mp4");
        assert_eq!(item.options(), options.as_slice());
    }

    #[test]
    fn meta_key_names_round_trip() {
        for key in MetaKey::ALL {
            assert_eq!(MetaKey::from_name(key.name()), Some(key));
        }
        assert_eq!(MetaKey::from_name("nope"), None);
    }

    #[test]
    fn only_open_states_are_active() {
        assert!(PlayerState::Playing.is_active());
        assert!(PlayerState::Paused.is_active());
        assert!(!PlayerState::Stopped.is_active());
        assert!(!PlayerState::Ended.is_active());
        assert!(!PlayerState::NothingSpecial.is_active());
    }
}
