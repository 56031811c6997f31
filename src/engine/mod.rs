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

//! Playback engine capability interface.
//!
//! The coordinator never decodes or renders anything itself. Everything it
//! knows about "what is playing" is read through a [`PlaybackEngine`], and
//! every transport or state change is written through to it.
//!
//! Implementations are shared between the caller's thread and the event
//! dispatcher thread, so all methods take `&self` and the engine provides
//! its own synchronisation.
//!
//! Only the media, transport, input and basic audio controls are required.
//! The remaining controls have default implementations that report
//! [`Error::Unsupported`] (or a neutral value for getters), which suits
//! audio-only engines.

#[cfg(feature = "mpv")]
pub mod mpv;

use crate::{
    error::{Error, Result},
    events::EventSink,
    model::{
        AudioChannel, MediaId, MediaItem, MetaKey, PlayerState, TrackDescription,
        overlay::{LogoOption, MarqueeOption},
    },
};

pub trait PlaybackEngine: Send + Sync + 'static {
    /// Whether the engine instance is usable. A player cannot be opened on an
    /// unavailable engine.
    fn is_available(&self) -> bool {
        true
    }

    /// Hands the engine the sink it must emit [`PlayerEvent`]s into.
    ///
    /// [`PlayerEvent`]: crate::events::PlayerEvent
    fn attach_events(&self, sink: EventSink) -> Result<()>;

    /// Engine-specific check that a location can be opened.
    fn validate_location(&self, _location: &str) -> Result<()> {
        Ok(())
    }

    fn version(&self) -> String;

    // Media

    /// Replaces the current media with `media` and starts playing it.
    fn play_media(&self, media: &MediaItem) -> Result<()>;

    /// The media the engine currently holds, if any.
    fn current_media(&self) -> Option<MediaId>;

    /// A descriptive tag of the current media.
    fn meta(&self, _key: MetaKey) -> Option<String> {
        None
    }

    // Transport

    /// Starts or resumes the current media.
    fn play(&self) -> Result<()>;

    fn pause(&self) -> Result<()>;

    fn toggle_pause(&self) -> Result<()>;

    fn stop(&self) -> Result<()>;

    fn state(&self) -> PlayerState;

    // Input

    /// Length of the current media in milliseconds.
    fn length_ms(&self) -> i64;

    /// Position as a fraction of the length, 0.0-1.0.
    fn position(&self) -> f32;

    fn set_position(&self, position: f32) -> Result<()>;

    fn time_ms(&self) -> i64;

    fn set_time_ms(&self, time_ms: i64) -> Result<()>;

    fn rate(&self) -> f32;

    fn set_rate(&self, rate: f32) -> Result<()>;

    fn fps(&self) -> f32 {
        0.0
    }

    fn has_vout(&self) -> bool {
        false
    }

    // Audio

    /// Volume in percent, 0-200.
    fn volume(&self) -> i32;

    fn set_volume(&self, volume: i32) -> Result<()>;

    fn is_muted(&self) -> bool;

    fn set_mute(&self, mute: bool) -> Result<()>;

    fn toggle_mute(&self) -> Result<()> {
        self.set_mute(!self.is_muted())
    }

    fn audio_channel(&self) -> Option<AudioChannel> {
        None
    }

    fn set_audio_channel(&self, _channel: AudioChannel) -> Result<()> {
        Err(Error::Unsupported("audio channel"))
    }

    fn audio_tracks(&self) -> Vec<TrackDescription> {
        Vec::new()
    }

    /// Engine-native id of the selected audio track, -1 for none.
    fn audio_track(&self) -> i32 {
        -1
    }

    fn set_audio_track(&self, _id: i32) -> Result<()> {
        Err(Error::Unsupported("audio track selection"))
    }

    // Subtitles

    fn spu_tracks(&self) -> Vec<TrackDescription> {
        Vec::new()
    }

    /// Engine-native id of the selected subtitle track, -1 for none.
    fn spu(&self) -> i32 {
        -1
    }

    fn set_spu(&self, _id: i32) -> Result<()> {
        Err(Error::Unsupported("subtitle selection"))
    }

    // Titles and chapters

    fn title(&self) -> i32 {
        -1
    }

    fn set_title(&self, _title: i32) -> Result<()> {
        Err(Error::Unsupported("title selection"))
    }

    fn title_count(&self) -> usize {
        0
    }

    fn chapter(&self) -> i32 {
        -1
    }

    fn set_chapter(&self, _chapter: i32) -> Result<()> {
        Err(Error::Unsupported("chapter selection"))
    }

    fn chapter_count(&self) -> usize {
        0
    }

    fn next_chapter(&self) -> Result<()> {
        self.set_chapter(self.chapter() + 1)
    }

    fn prev_chapter(&self) -> Result<()> {
        self.set_chapter(self.chapter() - 1)
    }

    // Video

    fn is_fullscreen(&self) -> bool {
        false
    }

    fn set_fullscreen(&self, _fullscreen: bool) -> Result<()> {
        Err(Error::Unsupported("fullscreen"))
    }

    /// Width and height of the first video output.
    fn video_size(&self) -> Option<(u32, u32)> {
        None
    }

    fn aspect_ratio(&self) -> Option<String> {
        None
    }

    /// `None` restores the source aspect ratio.
    fn set_aspect_ratio(&self, _ratio: Option<&str>) -> Result<()> {
        Err(Error::Unsupported("aspect ratio"))
    }

    fn crop_geometry(&self) -> Option<String> {
        None
    }

    /// `None` disables cropping.
    fn set_crop_geometry(&self, _geometry: Option<&str>) -> Result<()> {
        Err(Error::Unsupported("crop geometry"))
    }

    /// Selected teletext page, negative when teletext is unavailable.
    fn teletext(&self) -> i32 {
        -1
    }

    fn set_teletext(&self, _page: i32) -> Result<()> {
        Err(Error::Unsupported("teletext"))
    }

    fn toggle_teletext(&self) -> Result<()> {
        Err(Error::Unsupported("teletext"))
    }

    /// `None` disables deinterlacing, otherwise enables the named mode.
    fn set_deinterlace(&self, _mode: Option<&str>) -> Result<()> {
        Err(Error::Unsupported("deinterlace"))
    }

    // Overlays

    fn marquee_int(&self, _option: MarqueeOption) -> i32 {
        0
    }

    fn set_marquee_int(&self, _option: MarqueeOption, _value: i32) -> Result<()> {
        Err(Error::Unsupported("marquee"))
    }

    fn marquee_string(&self, _option: MarqueeOption) -> Option<String> {
        None
    }

    fn set_marquee_string(&self, _option: MarqueeOption, _value: &str) -> Result<()> {
        Err(Error::Unsupported("marquee"))
    }

    fn logo_int(&self, _option: LogoOption) -> i32 {
        0
    }

    fn set_logo_int(&self, _option: LogoOption, _value: i32) -> Result<()> {
        Err(Error::Unsupported("logo"))
    }

    fn set_logo_string(&self, _option: LogoOption, _value: &str) -> Result<()> {
        Err(Error::Unsupported("logo"))
    }
}
