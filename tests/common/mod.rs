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

#![allow(dead_code)]

//! A scripted in-memory engine for exercising the coordinator.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
    thread,
    time::{Duration, Instant},
};

use media_list_player::{
    Error, MediaId, MediaItem, MetaKey, PlaybackEngine, PlayerEvent, PlayerState, Result,
    TrackDescription,
    events::EventSink,
    model::overlay::{LogoOption, MarqueeOption},
};

#[derive(Default)]
pub struct FakeState {
    pub sink: Option<EventSink>,
    pub current: Option<MediaId>,
    pub current_location: Option<String>,
    pub state: PlayerState,
    pub loads: Vec<String>,
    pub resumes: usize,
    pub time_ms: i64,
    pub volume: i32,
    pub muted: bool,
    pub audio_tracks: Vec<TrackDescription>,
    pub audio_track: i32,
    pub spu_tracks: Vec<TrackDescription>,
    pub spu: i32,
    pub aspect_ratio: Option<String>,
    pub deinterlace: Option<String>,
    pub marquee: HashMap<MarqueeOption, i32>,
    pub marquee_text: String,
    pub logo: HashMap<LogoOption, i32>,
    pub logo_file: Option<String>,
    pub meta: HashMap<MetaKey, String>,
}

/// Like a real engine, a stopped or finished file is unloaded but stays the
/// current media; `play` then has to load it again.
pub struct FakeEngine {
    available: bool,
    inner: Mutex<FakeState>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            available: true,
            inner: Mutex::new(FakeState {
                state: PlayerState::Stopped,
                volume: 100,
                audio_track: -1,
                spu: -1,
                ..FakeState::default()
            }),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn state_mut(&self) -> MutexGuard<'_, FakeState> {
        self.inner.lock().unwrap()
    }

    pub fn loads(&self) -> Vec<String> {
        self.state_mut().loads.clone()
    }

    pub fn resumes(&self) -> usize {
        self.state_mut().resumes
    }

    /// Simulates the current media playing to its end.
    pub fn finish_current(&self) {
        let sink = {
            let mut state = self.state_mut();
            state.state = PlayerState::Ended;
            state.sink.clone()
        };

        if let Some(sink) = sink {
            sink.emit(PlayerEvent::EndReached);
        }
    }

    fn emit(&self, event: PlayerEvent) {
        if let Some(sink) = self.state_mut().sink.clone() {
            sink.emit(event);
        }
    }
}

impl PlaybackEngine for FakeEngine {
    fn is_available(&self) -> bool {
        self.available
    }

    fn attach_events(&self, sink: EventSink) -> Result<()> {
        self.state_mut().sink = Some(sink);
        Ok(())
    }

    fn validate_location(&self, location: &str) -> Result<()> {
        if location.starts_with("unreachable:") {
            return Err(Error::InvalidLocation(location.to_string()));
        }
        Ok(())
    }

    fn version(&self) -> String {
        "fake 1.0".to_string()
    }

    fn play_media(&self, media: &MediaItem) -> Result<()> {
        {
            let mut state = self.state_mut();
            state.current = Some(media.id());
            state.current_location = Some(media.location().to_string());
            state.state = PlayerState::Playing;
            state.time_ms = 0;
            state.loads.push(media.location().to_string());
        }

        self.emit(PlayerEvent::MediaChanged(Some(media.id())));
        Ok(())
    }

    fn current_media(&self) -> Option<MediaId> {
        self.state_mut().current
    }

    fn meta(&self, key: MetaKey) -> Option<String> {
        self.state_mut().meta.get(&key).cloned()
    }

    fn play(&self) -> Result<()> {
        let mut state = self.state_mut();
        let Some(location) = state.current_location.clone() else {
            return Ok(());
        };

        if state.state.is_active() {
            state.resumes += 1;
        } else {
            state.loads.push(location);
            state.time_ms = 0;
        }
        state.state = PlayerState::Playing;

        Ok(())
    }

    fn pause(&self) -> Result<()> {
        self.state_mut().state = PlayerState::Paused;
        Ok(())
    }

    fn toggle_pause(&self) -> Result<()> {
        let mut state = self.state_mut();
        state.state = match state.state {
            PlayerState::Playing => PlayerState::Paused,
            PlayerState::Paused => PlayerState::Playing,
            other => other,
        };
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.state_mut().state = PlayerState::Stopped;
        Ok(())
    }

    fn state(&self) -> PlayerState {
        self.state_mut().state
    }

    fn length_ms(&self) -> i64 {
        60_000
    }

    fn position(&self) -> f32 {
        self.state_mut().time_ms as f32 / 60_000.0
    }

    fn set_position(&self, position: f32) -> Result<()> {
        self.state_mut().time_ms = (position * 60_000.0) as i64;
        Ok(())
    }

    fn time_ms(&self) -> i64 {
        self.state_mut().time_ms
    }

    fn set_time_ms(&self, time_ms: i64) -> Result<()> {
        self.state_mut().time_ms = time_ms;
        Ok(())
    }

    fn rate(&self) -> f32 {
        1.0
    }

    fn set_rate(&self, _rate: f32) -> Result<()> {
        Ok(())
    }

    fn volume(&self) -> i32 {
        self.state_mut().volume
    }

    fn set_volume(&self, volume: i32) -> Result<()> {
        self.state_mut().volume = volume;
        Ok(())
    }

    fn is_muted(&self) -> bool {
        self.state_mut().muted
    }

    fn set_mute(&self, mute: bool) -> Result<()> {
        self.state_mut().muted = mute;
        Ok(())
    }

    fn audio_tracks(&self) -> Vec<TrackDescription> {
        self.state_mut().audio_tracks.clone()
    }

    fn audio_track(&self) -> i32 {
        self.state_mut().audio_track
    }

    fn set_audio_track(&self, id: i32) -> Result<()> {
        self.state_mut().audio_track = id;
        Ok(())
    }

    fn spu_tracks(&self) -> Vec<TrackDescription> {
        self.state_mut().spu_tracks.clone()
    }

    fn spu(&self) -> i32 {
        self.state_mut().spu
    }

    fn set_spu(&self, id: i32) -> Result<()> {
        self.state_mut().spu = id;
        Ok(())
    }

    fn aspect_ratio(&self) -> Option<String> {
        self.state_mut().aspect_ratio.clone()
    }

    fn set_aspect_ratio(&self, ratio: Option<&str>) -> Result<()> {
        self.state_mut().aspect_ratio = ratio.map(str::to_string);
        Ok(())
    }

    fn set_deinterlace(&self, mode: Option<&str>) -> Result<()> {
        self.state_mut().deinterlace = mode.map(str::to_string);
        Ok(())
    }

    fn marquee_int(&self, option: MarqueeOption) -> i32 {
        self.state_mut().marquee.get(&option).copied().unwrap_or(0)
    }

    fn set_marquee_int(&self, option: MarqueeOption, value: i32) -> Result<()> {
        self.state_mut().marquee.insert(option, value);
        Ok(())
    }

    fn marquee_string(&self, _option: MarqueeOption) -> Option<String> {
        Some(self.state_mut().marquee_text.clone())
    }

    fn set_marquee_string(&self, _option: MarqueeOption, value: &str) -> Result<()> {
        self.state_mut().marquee_text = value.to_string();
        Ok(())
    }

    fn logo_int(&self, option: LogoOption) -> i32 {
        self.state_mut().logo.get(&option).copied().unwrap_or(0)
    }

    fn set_logo_int(&self, option: LogoOption, value: i32) -> Result<()> {
        self.state_mut().logo.insert(option, value);
        Ok(())
    }

    fn set_logo_string(&self, _option: LogoOption, value: &str) -> Result<()> {
        self.state_mut().logo_file = Some(value.to_string());
        Ok(())
    }
}

/// Polls `condition` until it holds or two seconds pass.
pub fn wait_for(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);

    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }

    condition()
}
