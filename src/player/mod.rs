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

//! Playlist coordination.
//!
//! This module provides [`PlaylistPlayer`], which owns a list of media items
//! and keeps at most one of them active in a [`PlaybackEngine`]. The player
//! keeps no cursor of its own: the active index is always derived from the
//! media the engine currently holds, so the engine stays the only source of
//! truth for what is playing.
//!
//! List membership is guarded by a single lock (see [`list`]). Transport and
//! state calls go straight to the engine and rely on its own
//! synchronisation.
//!
//! When an item reaches its end the player advances according to its
//! [`PlaybackMode`]. This runs on the event dispatcher thread.

mod list;
mod overlay;
mod tracks;

pub use overlay::{Logo, Marquee};
pub use tracks::track_index_for_id;

use std::sync::{Arc, Mutex, Weak};

use crate::{
    config::PlayerConfig,
    engine::PlaybackEngine,
    error::{Error, Result},
    events::{EventKind, EventManager, ListenerId, PlayerEvent},
    model::{
        AudioChannel, MediaItem, MetaKey, PlaybackMode, PlayerState, TrackDescription,
    },
    player::list::MediaList,
};

const MAX_VOLUME: u32 = 200;

/// State shared with the event dispatcher thread.
struct Shared<E: PlaybackEngine> {
    engine: E,
    list: MediaList,
    mode: Mutex<PlaybackMode>,
}

impl<E: PlaybackEngine> Shared<E> {
    fn current_index(&self) -> Option<usize> {
        let current = self.engine.current_media()?;
        self.list.index_of(current)
    }

    fn play_index(&self, index: usize) -> Result<()> {
        let item = self.list.get(index).ok_or_else(|| Error::IndexOutOfRange {
            index,
            len: self.list.len(),
        })?;

        log::debug!("Playing item {} ({})", index, item.location());

        self.engine.play_media(&item)
    }

    fn mode(&self) -> PlaybackMode {
        *self.mode.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Picks what to play after the active item ended.
    fn advance_on_end(&self) -> Result<()> {
        let Some(index) = self.current_index() else {
            return Ok(());
        };

        let next = match self.mode() {
            PlaybackMode::Repeat => index,
            PlaybackMode::Loop if index + 1 >= self.list.len() => 0,
            PlaybackMode::Loop | PlaybackMode::Default => index + 1,
        };

        if next < self.list.len() {
            self.play_index(next)
        } else {
            log::debug!("End of playlist reached");
            Ok(())
        }
    }
}

/// Coordinates a media list with a single playback engine.
pub struct PlaylistPlayer<E: PlaybackEngine> {
    shared: Arc<Shared<E>>,
    events: EventManager,
}

impl<E: PlaybackEngine> PlaylistPlayer<E> {
    /// Binds a new, empty playlist to `engine`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineUnavailable`] if the engine reports it cannot
    /// be used, or the engine's error if it refuses the event sink. Nothing
    /// is retained on failure.
    pub fn open(engine: E) -> Result<Self> {
        if !engine.is_available() {
            return Err(Error::EngineUnavailable);
        }

        let events = EventManager::new();
        engine.attach_events(events.sink())?;

        let shared = Arc::new(Shared {
            engine,
            list: MediaList::new(),
            mode: Mutex::new(PlaybackMode::Default),
        });

        let weak: Weak<Shared<E>> = Arc::downgrade(&shared);
        events.subscribe(EventKind::EndReached, move |_| {
            if let Some(shared) = weak.upgrade() {
                if let Err(e) = shared.advance_on_end() {
                    log::warn!("Failed to advance playlist: {}", e);
                }
            }
        });

        log::info!("Opened playlist player on {}", shared.engine.version());

        Ok(Self { shared, events })
    }

    /// Opens a player and applies `config` to it.
    pub fn open_with_config(engine: E, config: &PlayerConfig) -> Result<Self> {
        let player = Self::open(engine)?;
        player.apply_config(config)?;
        Ok(player)
    }

    /// Applies startup settings: loop mode, mute, volume, and the initial
    /// target, which is played immediately when `autoplay` is set.
    ///
    /// A volume outside 0-200 is ignored. The target is checked before any
    /// setting is applied, so an unusable target changes nothing.
    pub fn apply_config(&self, config: &PlayerConfig) -> Result<()> {
        let target = config
            .target
            .as_deref()
            .map(|target| self.prepare_item(target, &config.target_options))
            .transpose()?;

        if config.mute {
            self.shared.engine.set_mute(true)?;
        }

        match config.volume {
            Some(volume) if volume <= MAX_VOLUME => self.shared.engine.set_volume(volume as i32)?,
            Some(volume) => log::warn!("Ignoring configured volume {}", volume),
            None => {}
        }

        self.set_playback_mode(if config.autoloop {
            PlaybackMode::Loop
        } else {
            PlaybackMode::Default
        });

        if let Some(item) = target {
            self.push_item(item);

            if config.autoplay {
                self.play()?;
            }
        }

        Ok(())
    }

    /// The underlying engine.
    pub fn engine(&self) -> &E {
        &self.shared.engine
    }

    // Playlist

    /// Appends a new item for `location` with one-shot `options`, returning
    /// its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] (or the engine's rejection) if the
    /// location cannot be opened; the list is unchanged.
    pub fn add_item(&self, location: &str, options: &[String]) -> Result<usize> {
        let item = self.prepare_item(location, options)?;
        Ok(self.push_item(item))
    }

    fn prepare_item(&self, location: &str, options: &[String]) -> Result<MediaItem> {
        let item = MediaItem::from_location(location, options)?;
        self.shared.engine.validate_location(item.location())?;
        Ok(item)
    }

    fn push_item(&self, item: MediaItem) -> usize {
        let location = item.location().to_string();
        let index = self.shared.list.push(item);

        log::debug!("Added {} at index {}", location, index);

        index
    }

    pub fn items_count(&self) -> usize {
        self.shared.list.len()
    }

    /// A snapshot of the playlist.
    pub fn items(&self) -> Vec<MediaItem> {
        self.shared.list.items()
    }

    /// Index of the item the engine currently holds, `None` if it holds
    /// nothing or its media is not in this list.
    pub fn current_item_index(&self) -> Option<usize> {
        self.shared.current_index()
    }

    /// Removes the item at `index`, returning whether anything was removed.
    ///
    /// Removing the active item stops playback, so the engine is never left
    /// playing an item that is no longer in the list.
    pub fn remove_item(&self, index: usize) -> bool {
        let Some(removed) = self.shared.list.remove(index) else {
            return false;
        };

        log::debug!("Removed {} from index {}", removed.location(), index);

        if self.shared.engine.current_media() == Some(removed.id()) {
            self.stop_detached();
        }

        true
    }

    /// Removes every item, stopping playback if one of them was active.
    pub fn clear(&self) {
        let removed = self.shared.list.clear();

        log::debug!("Cleared {} item(s)", removed.len());

        let current = self.shared.engine.current_media();
        if current.is_some_and(|id| removed.iter().any(|item| item.id() == id)) {
            self.stop_detached();
        }
    }

    fn stop_detached(&self) {
        log::debug!("Active item left the playlist, stopping");

        if let Err(e) = self.shared.engine.stop() {
            log::warn!("Failed to stop removed item: {}", e);
        }
    }

    pub fn playback_mode(&self) -> PlaybackMode {
        self.shared.mode()
    }

    pub fn set_playback_mode(&self, mode: PlaybackMode) {
        *self
            .shared
            .mode
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = mode;
    }

    // Transport

    /// Ensures something is playing.
    ///
    /// Does nothing on an empty list. Starts the first item if none is
    /// active, otherwise resumes the active item without restarting it.
    pub fn play(&self) -> Result<()> {
        if self.shared.current_index().is_some() {
            return self.shared.engine.play();
        }

        self.step_to(0).map(|_| ())
    }

    /// Loads and starts the item at `index`, replacing whatever was active.
    pub fn play_item(&self, index: usize) -> Result<()> {
        self.shared.play_index(index)
    }

    pub fn pause(&self) -> Result<()> {
        self.shared.engine.pause()
    }

    pub fn toggle_pause(&self) -> Result<()> {
        self.shared.engine.toggle_pause()
    }

    pub fn stop(&self) -> Result<()> {
        self.shared.engine.stop()
    }

    /// Starts the item after the active one. Returns `false`, changing
    /// nothing, when there is no active item or it is the last one.
    pub fn next(&self) -> Result<bool> {
        let Some(index) = self.shared.current_index() else {
            return Ok(false);
        };

        self.step_to(index + 1)
    }

    /// Starts the item before the active one. Returns `false`, changing
    /// nothing, when there is no active item or it is the first one.
    pub fn prev(&self) -> Result<bool> {
        let Some(index) = self.shared.current_index().and_then(|i| i.checked_sub(1)) else {
            return Ok(false);
        };

        self.step_to(index)
    }

    fn step_to(&self, index: usize) -> Result<bool> {
        let Some(item) = self.shared.list.get(index) else {
            return Ok(false);
        };

        self.shared.engine.play_media(&item)?;
        Ok(true)
    }

    pub fn is_playing(&self) -> bool {
        self.shared.engine.state() == PlayerState::Playing
    }

    pub fn state(&self) -> PlayerState {
        self.shared.engine.state()
    }

    // Input

    pub fn length_ms(&self) -> i64 {
        self.shared.engine.length_ms()
    }

    pub fn position(&self) -> f32 {
        self.shared.engine.position()
    }

    pub fn set_position(&self, position: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&position) {
            return Err(Error::InvalidValue(format!("position {}", position)));
        }
        self.shared.engine.set_position(position)
    }

    pub fn time_ms(&self) -> i64 {
        self.shared.engine.time_ms()
    }

    pub fn set_time_ms(&self, time_ms: i64) -> Result<()> {
        self.shared.engine.set_time_ms(time_ms)
    }

    pub fn rate(&self) -> f32 {
        self.shared.engine.rate()
    }

    pub fn set_rate(&self, rate: f32) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::InvalidValue(format!("rate {}", rate)));
        }
        self.shared.engine.set_rate(rate)
    }

    pub fn fps(&self) -> f32 {
        self.shared.engine.fps()
    }

    pub fn has_vout(&self) -> bool {
        self.shared.engine.has_vout()
    }

    // Audio

    pub fn volume(&self) -> i32 {
        self.shared.engine.volume()
    }

    /// Sets the volume in percent, 0-200.
    pub fn set_volume(&self, volume: i32) -> Result<()> {
        if !(0..=MAX_VOLUME as i32).contains(&volume) {
            return Err(Error::InvalidValue(format!("volume {}", volume)));
        }
        self.shared.engine.set_volume(volume)
    }

    pub fn is_muted(&self) -> bool {
        self.shared.engine.is_muted()
    }

    pub fn set_mute(&self, mute: bool) -> Result<()> {
        self.shared.engine.set_mute(mute)
    }

    pub fn toggle_mute(&self) -> Result<()> {
        self.shared.engine.toggle_mute()
    }

    pub fn audio_channel(&self) -> Option<AudioChannel> {
        self.shared.engine.audio_channel()
    }

    pub fn set_audio_channel(&self, channel: AudioChannel) -> Result<()> {
        self.shared.engine.set_audio_channel(channel)
    }

    pub fn audio_tracks(&self) -> Vec<TrackDescription> {
        self.shared.engine.audio_tracks()
    }

    pub fn audio_track_count(&self) -> usize {
        self.shared.engine.audio_tracks().len()
    }

    /// Position of the selected audio track in [`Self::audio_tracks`].
    pub fn current_audio_track(&self) -> Option<usize> {
        let engine = &self.shared.engine;
        track_index_for_id(engine.audio_track(), &engine.audio_tracks())
    }

    /// Selects the audio track at position `index` in [`Self::audio_tracks`].
    pub fn set_audio_track(&self, index: usize) -> Result<()> {
        let tracks = self.shared.engine.audio_tracks();
        let track = select_track(&tracks, index, "audio")?;
        self.shared.engine.set_audio_track(track.id)
    }

    // Subtitles

    pub fn subtitle_tracks(&self) -> Vec<TrackDescription> {
        self.shared.engine.spu_tracks()
    }

    pub fn subtitle_track_count(&self) -> usize {
        self.shared.engine.spu_tracks().len()
    }

    /// Position of the selected subtitle track in [`Self::subtitle_tracks`].
    pub fn current_subtitle_track(&self) -> Option<usize> {
        let engine = &self.shared.engine;
        track_index_for_id(engine.spu(), &engine.spu_tracks())
    }

    pub fn set_subtitle_track(&self, index: usize) -> Result<()> {
        let tracks = self.shared.engine.spu_tracks();
        let track = select_track(&tracks, index, "subtitle")?;
        self.shared.engine.set_spu(track.id)
    }

    /// Engine-native id of the selected subtitle track.
    pub fn spu(&self) -> i32 {
        self.shared.engine.spu()
    }

    pub fn set_spu(&self, id: i32) -> Result<()> {
        self.shared.engine.set_spu(id)
    }

    // Titles and chapters

    pub fn title(&self) -> i32 {
        self.shared.engine.title()
    }

    pub fn set_title(&self, title: i32) -> Result<()> {
        self.shared.engine.set_title(title)
    }

    pub fn title_count(&self) -> usize {
        self.shared.engine.title_count()
    }

    pub fn chapter(&self) -> i32 {
        self.shared.engine.chapter()
    }

    pub fn set_chapter(&self, chapter: i32) -> Result<()> {
        self.shared.engine.set_chapter(chapter)
    }

    pub fn chapter_count(&self) -> usize {
        self.shared.engine.chapter_count()
    }

    pub fn next_chapter(&self) -> Result<()> {
        self.shared.engine.next_chapter()
    }

    pub fn prev_chapter(&self) -> Result<()> {
        self.shared.engine.prev_chapter()
    }

    // Video

    pub fn is_fullscreen(&self) -> bool {
        self.shared.engine.is_fullscreen()
    }

    pub fn set_fullscreen(&self, fullscreen: bool) -> Result<()> {
        self.shared.engine.set_fullscreen(fullscreen)
    }

    pub fn toggle_fullscreen(&self) -> Result<()> {
        let engine = &self.shared.engine;
        engine.set_fullscreen(!engine.is_fullscreen())
    }

    pub fn video_size(&self) -> Option<(u32, u32)> {
        self.shared.engine.video_size()
    }

    pub fn aspect_ratio(&self) -> Option<String> {
        self.shared.engine.aspect_ratio().filter(|ratio| !ratio.is_empty())
    }

    /// Sets the aspect ratio, e.g. `"16:9"`. `"default"` or an empty string
    /// restores the source ratio.
    pub fn set_aspect_ratio(&self, ratio: &str) -> Result<()> {
        let ratio = match ratio {
            "" | "default" => None,
            ratio => Some(ratio),
        };
        self.shared.engine.set_aspect_ratio(ratio)
    }

    pub fn crop_geometry(&self) -> Option<String> {
        self.shared
            .engine
            .crop_geometry()
            .filter(|geometry| !geometry.is_empty())
    }

    /// Sets the crop geometry, e.g. `"16:10"` or `"1280x720+0+0"`. An empty
    /// string disables cropping.
    pub fn set_crop_geometry(&self, geometry: &str) -> Result<()> {
        let geometry = Some(geometry).filter(|geometry| !geometry.is_empty());
        self.shared.engine.set_crop_geometry(geometry)
    }

    /// The selected teletext page, `None` when teletext is unavailable.
    pub fn teletext(&self) -> Option<i32> {
        Some(self.shared.engine.teletext()).filter(|page| *page >= 0)
    }

    pub fn set_teletext(&self, page: i32) -> Result<()> {
        self.shared.engine.set_teletext(page)
    }

    pub fn toggle_teletext(&self) -> Result<()> {
        self.shared.engine.toggle_teletext()
    }

    pub fn enable_deinterlace(&self, mode: &str) -> Result<()> {
        if mode.is_empty() {
            return Err(Error::InvalidValue("empty deinterlace mode".to_string()));
        }
        self.shared.engine.set_deinterlace(Some(mode))
    }

    pub fn disable_deinterlace(&self) -> Result<()> {
        self.shared.engine.set_deinterlace(None)
    }

    pub fn marquee(&self) -> Marquee<'_, E> {
        Marquee::new(&self.shared.engine)
    }

    pub fn logo(&self) -> Logo<'_, E> {
        Logo::new(&self.shared.engine)
    }

    // Metadata

    /// A descriptive tag of the loaded media, `None` when nothing is loaded
    /// or the tag is absent.
    pub fn media_meta(&self, key: MetaKey) -> Option<String> {
        self.shared.engine.current_media()?;
        self.shared.engine.meta(key)
    }

    pub fn engine_version(&self) -> String {
        self.shared.engine.version()
    }

    // Events

    /// Registers `callback` for events of `kind`. Callbacks run on the event
    /// dispatcher thread, never on the caller's.
    pub fn add_event_listener<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&PlayerEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(kind, callback)
    }

    pub fn add_event_channel(
        &self,
        kind: EventKind,
    ) -> (ListenerId, std::sync::mpsc::Receiver<PlayerEvent>) {
        self.events.subscribe_channel(kind)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }
}

fn select_track<'a>(
    tracks: &'a [TrackDescription],
    index: usize,
    kind: &str,
) -> Result<&'a TrackDescription> {
    tracks.get(index).ok_or_else(|| {
        Error::InvalidValue(format!(
            "{} track {} of {}",
            kind,
            index,
            tracks.len()
        ))
    })
}
