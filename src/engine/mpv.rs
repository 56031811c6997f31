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

//! MPV-backed playback engine.
//!
//! [`MpvEngine`] drives `libmpv` from a background worker thread that owns
//! the MPV context, so callers on any thread (including the event
//! dispatcher) can use the engine through `&self`.
//!
//! # Architecture
//!
//! The engine operates using a request/observe pattern:
//! 1. **Request Channel**: commands, property writes and property reads are
//!    sent to the worker; each carries a reply channel for its result.
//! 2. **Property Observation**: the worker observes playback properties,
//!    keeps a [`Status`] snapshot current and emits [`PlayerEvent`]s into
//!    the attached [`EventSink`].
//!
//! Marquee settings are kept locally and rendered as OSD text; MPV has no
//! logo overlay, so logo controls report [`Error::Unsupported`].

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, Sender, TryRecvError},
    },
    thread,
};

use mpv::Format;

use crate::{
    engine::PlaybackEngine,
    error::{Error, Result},
    events::{EventSink, PlayerEvent},
    model::{
        MediaId, MediaItem, MetaKey, PlayerState, TrackDescription, overlay::MarqueeOption,
    },
};

/// Seconds to wait for an MPV event before checking for requests again.
const EVENT_WAIT: f64 = 0.02;

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Flag(bool),
    Int(i64),
    Double(f64),
    Str(String),
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Flag,
    Int,
    Double,
    Str,
}

#[derive(Debug)]
enum Request {
    AttachSink(EventSink),
    Command(Vec<String>, Sender<Result<()>>),
    Set(String, Value, Sender<Result<()>>),
    Get(String, Kind, Sender<Result<Value>>),
}

/// Playback state maintained from observed properties.
#[derive(Debug, Clone, Copy, Default)]
struct Status {
    state: PlayerState,
    time_ms: i64,
    position: f32,
    length_ms: i64,
}

#[derive(Debug, Default)]
struct MarqueeState {
    ints: HashMap<MarqueeOption, i32>,
    text: String,
}

/// The media the engine was last asked to play.
#[derive(Debug, Clone)]
struct Loaded {
    id: MediaId,
    location: String,
    options: Vec<String>,
}

pub struct MpvEngine {
    request_tx: Sender<Request>,
    alive: Arc<AtomicBool>,
    status: Arc<Mutex<Status>>,
    loaded: Mutex<Option<Loaded>>,
    marquee: Mutex<MarqueeState>,
    sink: Mutex<Option<EventSink>>,
    loadfile_takes_index: bool,
}

impl MpvEngine {
    /// Starts an MPV instance with default options.
    pub fn new() -> Result<Self> {
        Self::with_options(&[])
    }

    /// Starts an MPV instance, applying `options` (e.g. `("vo", "null")`)
    /// before initialisation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineUnavailable`] if the MPV context cannot be
    /// created.
    pub fn with_options(options: &[(&str, &str)]) -> Result<Self> {
        let options: Vec<(String, String)> = options
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        let (request_tx, request_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();

        let alive = Arc::new(AtomicBool::new(true));
        let status = Arc::new(Mutex::new(Status::default()));

        spawn_mpv_worker(
            options,
            request_rx,
            ready_tx,
            Arc::clone(&alive),
            Arc::clone(&status),
        );

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log::error!("MPV initialisation failed: {}", e);
                return Err(Error::EngineUnavailable);
            }
            Err(_) => return Err(Error::EngineUnavailable),
        }

        let mut engine = Self {
            request_tx,
            alive,
            status,
            loaded: Mutex::new(None),
            marquee: Mutex::new(MarqueeState::default()),
            sink: Mutex::new(None),
            loadfile_takes_index: false,
        };

        if let Some(version) = engine.get_string("mpv-version") {
            engine.loadfile_takes_index = loadfile_takes_index(&version);
            log::info!("Using {}", version);
        }

        Ok(engine)
    }

    fn send(&self, request: Request) -> Result<()> {
        self.request_tx
            .send(request)
            .map_err(|_| Error::EngineUnavailable)
    }

    fn command(&self, args: &[&str]) -> Result<()> {
        let (reply_tx, reply_rx) = mpsc::channel();
        let args = args.iter().map(|arg| arg.to_string()).collect();
        self.send(Request::Command(args, reply_tx))?;
        reply_rx.recv().map_err(|_| Error::EngineUnavailable)?
    }

    fn set(&self, name: &str, value: Value) -> Result<()> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.send(Request::Set(name.to_string(), value, reply_tx))?;
        reply_rx.recv().map_err(|_| Error::EngineUnavailable)?
    }

    fn get(&self, name: &str, kind: Kind) -> Result<Value> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.send(Request::Get(name.to_string(), kind, reply_tx))?;
        reply_rx.recv().map_err(|_| Error::EngineUnavailable)?
    }

    fn get_flag(&self, name: &str) -> Option<bool> {
        match self.get(name, Kind::Flag) {
            Ok(Value::Flag(value)) => Some(value),
            _ => None,
        }
    }

    fn get_int(&self, name: &str) -> Option<i64> {
        match self.get(name, Kind::Int) {
            Ok(Value::Int(value)) => Some(value),
            _ => None,
        }
    }

    fn get_double(&self, name: &str) -> Option<f64> {
        match self.get(name, Kind::Double) {
            Ok(Value::Double(value)) => Some(value),
            _ => None,
        }
    }

    fn get_string(&self, name: &str) -> Option<String> {
        match self.get(name, Kind::Str) {
            Ok(Value::Str(value)) => Some(value),
            _ => None,
        }
    }

    fn status(&self) -> Status {
        *self.status.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Overwrites the state snapshot ahead of the worker, returning the old
    /// state.
    fn replace_state(&self, state: PlayerState) -> PlayerState {
        let mut status = self.status.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut status.state, state)
    }

    fn loaded(&self) -> MutexGuard<'_, Option<Loaded>> {
        self.loaded.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: PlayerEvent) {
        let sink = self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(sink) = sink.as_ref() {
            sink.emit(event);
        }
    }

    /// Replaces the current file with `location` and starts it.
    fn load(&self, location: &str, options: &[String]) -> Result<()> {
        // One-shot options use the `:name=value` form; loadfile takes them
        // as a comma separated `name=value` list.
        let options = options
            .iter()
            .map(|option| option.trim_start_matches(':'))
            .filter(|option| !option.is_empty())
            .collect::<Vec<_>>()
            .join(",");

        let mut args = vec!["loadfile", location, "replace"];
        if !options.is_empty() {
            if self.loadfile_takes_index {
                args.push("-1");
            }
            args.push(&options);
        }

        let previous = self.replace_state(PlayerState::Opening);
        if let Err(e) = self.command(&args) {
            self.replace_state(previous);
            return Err(e);
        }

        self.set("pause", Value::Flag(false))
    }

    /// Tracks of one type (`"audio"`, `"sub"`), preceded by a "Disable"
    /// entry with id -1.
    fn tracks(&self, track_type: &str) -> Vec<TrackDescription> {
        let count = self.get_int("track-list/count").unwrap_or(0);

        let mut tracks = vec![TrackDescription::new(-1, "Disable")];

        for i in 0..count {
            if self.get_string(&format!("track-list/{}/type", i)).as_deref() != Some(track_type) {
                continue;
            }

            let Some(id) = self.get_int(&format!("track-list/{}/id", i)) else {
                continue;
            };

            let name = self
                .get_string(&format!("track-list/{}/title", i))
                .or_else(|| self.get_string(&format!("track-list/{}/lang", i)))
                .unwrap_or_else(|| format!("Track {}", id));

            tracks.push(TrackDescription::new(id as i32, name));
        }

        tracks
    }

    /// Reads a track selection property (`aid`, `sid`), -1 for none.
    fn track_selection(&self, name: &str) -> i32 {
        self.get_string(name)
            .and_then(|value| value.parse().ok())
            .unwrap_or(-1)
    }

    fn set_track_selection(&self, name: &str, id: i32) -> Result<()> {
        if id < 0 {
            self.set(name, Value::Str("no".to_string()))
        } else {
            self.set(name, Value::Int(i64::from(id)))
        }
    }

    fn render_marquee(&self) -> Result<()> {
        let (enabled, text, timeout) = {
            let marquee = self.marquee.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            (
                marquee.ints.get(&MarqueeOption::Enable).copied().unwrap_or(0) != 0,
                marquee.text.clone(),
                marquee.ints.get(&MarqueeOption::Timeout).copied().unwrap_or(0),
            )
        };

        if enabled {
            let duration = if timeout > 0 { timeout.to_string() } else { "-1".to_string() };
            self.command(&["show-text", &text, &duration])
        } else {
            self.command(&["show-text", "", "1"])
        }
    }
}

impl PlaybackEngine for MpvEngine {
    fn is_available(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    fn attach_events(&self, sink: EventSink) -> Result<()> {
        *self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(sink.clone());
        self.send(Request::AttachSink(sink))
    }

    fn version(&self) -> String {
        self.get_string("mpv-version")
            .unwrap_or_else(|| "mpv".to_string())
    }

    fn play_media(&self, media: &MediaItem) -> Result<()> {
        self.load(media.location(), media.options())?;

        *self.loaded() = Some(Loaded {
            id: media.id(),
            location: media.location().to_string(),
            options: media.options().to_vec(),
        });

        self.emit(PlayerEvent::MediaChanged(Some(media.id())));

        Ok(())
    }

    fn current_media(&self) -> Option<MediaId> {
        self.loaded().as_ref().map(|loaded| loaded.id)
    }

    fn meta(&self, key: MetaKey) -> Option<String> {
        let tag = match key {
            MetaKey::Url => return self.loaded().as_ref().map(|l| l.location.clone()),
            MetaKey::Title => {
                return self
                    .get_string("metadata/by-key/title")
                    .or_else(|| self.get_string("media-title"));
            }
            MetaKey::Artist => "artist",
            MetaKey::Genre => "genre",
            MetaKey::Copyright => "copyright",
            MetaKey::Album => "album",
            MetaKey::TrackNumber => "track",
            MetaKey::Description => "comment",
            MetaKey::Date => "date",
            MetaKey::Language => "language",
            MetaKey::NowPlaying => "icy-title",
            MetaKey::Publisher => "publisher",
            MetaKey::EncodedBy => "encoder",
            MetaKey::Rating | MetaKey::Setting | MetaKey::ArtworkUrl | MetaKey::TrackId => {
                return None;
            }
        };

        self.get_string(&format!("metadata/by-key/{}", tag))
    }

    /// Resumes the loaded media. MPV unloads a file when it is stopped or
    /// plays to its end, so in that case the file is loaded again.
    fn play(&self) -> Result<()> {
        if !self.status().state.is_active() {
            let loaded = self.loaded().clone();

            if let Some(loaded) = loaded {
                log::debug!("Reloading {}", loaded.location);
                return self.load(&loaded.location, &loaded.options);
            }
        }

        self.set("pause", Value::Flag(false))
    }

    fn pause(&self) -> Result<()> {
        self.set("pause", Value::Flag(true))
    }

    fn toggle_pause(&self) -> Result<()> {
        self.command(&["cycle", "pause"])
    }

    fn stop(&self) -> Result<()> {
        self.command(&["stop"])?;

        if self.replace_state(PlayerState::Stopped) != PlayerState::Stopped {
            self.emit(PlayerEvent::Stopped);
        }

        Ok(())
    }

    fn state(&self) -> PlayerState {
        self.status().state
    }

    fn length_ms(&self) -> i64 {
        self.status().length_ms
    }

    fn position(&self) -> f32 {
        self.status().position
    }

    fn set_position(&self, position: f32) -> Result<()> {
        let percent = (position * 100.0).to_string();
        self.command(&["seek", &percent, "absolute-percent"])
    }

    fn time_ms(&self) -> i64 {
        self.status().time_ms
    }

    fn set_time_ms(&self, time_ms: i64) -> Result<()> {
        let seconds = (time_ms as f64 / 1000.0).to_string();
        self.command(&["seek", &seconds, "absolute"])
    }

    fn rate(&self) -> f32 {
        self.get_double("speed").unwrap_or(1.0) as f32
    }

    fn set_rate(&self, rate: f32) -> Result<()> {
        self.set("speed", Value::Double(f64::from(rate)))
    }

    fn fps(&self) -> f32 {
        self.get_double("container-fps").unwrap_or(0.0) as f32
    }

    fn has_vout(&self) -> bool {
        self.get_flag("vo-configured").unwrap_or(false)
    }

    fn volume(&self) -> i32 {
        self.get_double("volume").unwrap_or(0.0).round() as i32
    }

    fn set_volume(&self, volume: i32) -> Result<()> {
        self.set("volume", Value::Double(f64::from(volume)))
    }

    fn is_muted(&self) -> bool {
        self.get_flag("mute").unwrap_or(false)
    }

    fn set_mute(&self, mute: bool) -> Result<()> {
        self.set("mute", Value::Flag(mute))
    }

    fn toggle_mute(&self) -> Result<()> {
        self.command(&["cycle", "mute"])
    }

    fn audio_tracks(&self) -> Vec<TrackDescription> {
        self.tracks("audio")
    }

    fn audio_track(&self) -> i32 {
        self.track_selection("aid")
    }

    fn set_audio_track(&self, id: i32) -> Result<()> {
        self.set_track_selection("aid", id)
    }

    fn spu_tracks(&self) -> Vec<TrackDescription> {
        self.tracks("sub")
    }

    fn spu(&self) -> i32 {
        self.track_selection("sid")
    }

    fn set_spu(&self, id: i32) -> Result<()> {
        self.set_track_selection("sid", id)
    }

    fn title(&self) -> i32 {
        self.get_int("edition").map_or(-1, |edition| edition as i32)
    }

    fn set_title(&self, title: i32) -> Result<()> {
        self.set("edition", Value::Int(i64::from(title)))
    }

    fn title_count(&self) -> usize {
        self.get_int("editions").map_or(0, |count| count.max(0) as usize)
    }

    fn chapter(&self) -> i32 {
        self.get_int("chapter").map_or(-1, |chapter| chapter as i32)
    }

    fn set_chapter(&self, chapter: i32) -> Result<()> {
        self.set("chapter", Value::Int(i64::from(chapter)))
    }

    fn chapter_count(&self) -> usize {
        self.get_int("chapters").map_or(0, |count| count.max(0) as usize)
    }

    fn is_fullscreen(&self) -> bool {
        self.get_flag("fullscreen").unwrap_or(false)
    }

    fn set_fullscreen(&self, fullscreen: bool) -> Result<()> {
        self.set("fullscreen", Value::Flag(fullscreen))
    }

    fn video_size(&self) -> Option<(u32, u32)> {
        let width = self.get_int("width")?;
        let height = self.get_int("height")?;
        Some((width.max(0) as u32, height.max(0) as u32))
    }

    fn aspect_ratio(&self) -> Option<String> {
        self.get_string("video-aspect-override")
            .filter(|ratio| ratio != "-1" && ratio != "no")
    }

    fn set_aspect_ratio(&self, ratio: Option<&str>) -> Result<()> {
        self.set(
            "video-aspect-override",
            Value::Str(ratio.unwrap_or("-1").to_string()),
        )
    }

    fn crop_geometry(&self) -> Option<String> {
        self.get_string("video-crop")
    }

    fn set_crop_geometry(&self, geometry: Option<&str>) -> Result<()> {
        self.set("video-crop", Value::Str(geometry.unwrap_or("").to_string()))
    }

    fn teletext(&self) -> i32 {
        self.get_int("teletext-page").map_or(-1, |page| page as i32)
    }

    fn set_teletext(&self, page: i32) -> Result<()> {
        self.set("teletext-page", Value::Int(i64::from(page)))
    }

    fn set_deinterlace(&self, mode: Option<&str>) -> Result<()> {
        if let Some(mode) = mode {
            log::debug!("MPV picks its own deinterlacer, ignoring mode {}", mode);
        }
        let value = if mode.is_some() { "yes" } else { "no" };
        self.set("deinterlace", Value::Str(value.to_string()))
    }

    fn marquee_int(&self, option: MarqueeOption) -> i32 {
        let marquee = self.marquee.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        marquee.ints.get(&option).copied().unwrap_or(0)
    }

    fn set_marquee_int(&self, option: MarqueeOption, value: i32) -> Result<()> {
        self.marquee
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .ints
            .insert(option, value);

        match option {
            MarqueeOption::Enable | MarqueeOption::Timeout => self.render_marquee(),
            _ => Ok(()),
        }
    }

    fn marquee_string(&self, option: MarqueeOption) -> Option<String> {
        match option {
            MarqueeOption::Text => Some(
                self.marquee
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .text
                    .clone(),
            ),
            _ => None,
        }
    }

    fn set_marquee_string(&self, option: MarqueeOption, value: &str) -> Result<()> {
        if option != MarqueeOption::Text {
            return Err(Error::InvalidValue(format!("{:?} is not a text option", option)));
        }

        self.marquee
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .text = value.to_string();

        self.render_marquee()
    }
}

/// Whether `loadfile` expects an insertion index before its options, which
/// it does from mpv 0.38. `version` is the `mpv-version` property, e.g.
/// `"mpv v0.38.0"` or `"mpv 0.35.1-dirty"`.
fn loadfile_takes_index(version: &str) -> bool {
    let numbers = version
        .trim_start_matches("mpv")
        .trim_start()
        .trim_start_matches('v');

    let mut parts = numbers.split(|c: char| !c.is_ascii_digit());
    let major = parts.next().and_then(|part| part.parse::<u32>().ok());
    let minor = parts.next().and_then(|part| part.parse::<u32>().ok());

    match (major, minor) {
        (Some(major), Some(minor)) => (major, minor) >= (0, 38),
        _ => false,
    }
}

/// Spawns the worker thread that owns the MPV context.
///
/// The outcome of initialisation is reported through `ready_tx`. The worker
/// exits when every request sender is dropped, clearing `alive`.
fn spawn_mpv_worker(
    options: Vec<(String, String)>,
    request_rx: Receiver<Request>,
    ready_tx: Sender<Result<()>>,
    alive: Arc<AtomicBool>,
    status: Arc<Mutex<Status>>,
) {
    thread::spawn(move || {
        let handler = match create_handler(&options) {
            Ok(handler) => {
                let _ = ready_tx.send(Ok(()));
                handler
            }
            Err(e) => {
                alive.store(false, Ordering::Release);
                let _ = ready_tx.send(Err(e));
                return;
            }
        };

        mpv_worker(handler, request_rx, status);

        alive.store(false, Ordering::Release);
    });
}

fn engine_error(e: mpv::Error) -> Error {
    Error::Engine(format!("{:?}", e))
}

fn create_handler(options: &[(String, String)]) -> Result<mpv::MpvHandler> {
    let mut builder = mpv::MpvHandlerBuilder::new().map_err(engine_error)?;

    for (name, value) in options {
        builder
            .set_option(name, value.as_str())
            .map_err(engine_error)?;
    }

    let mut handler = builder.build().map_err(engine_error)?;

    handler
        .observe_property::<bool>("pause", 0)
        .map_err(engine_error)?;
    handler
        .observe_property::<bool>("idle-active", 0)
        .map_err(engine_error)?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .map_err(engine_error)?;
    handler
        .observe_property::<f64>("percent-pos", 0)
        .map_err(engine_error)?;
    handler
        .observe_property::<f64>("duration", 0)
        .map_err(engine_error)?;
    handler
        .observe_property::<bool>("seekable", 0)
        .map_err(engine_error)?;
    handler
        .observe_property::<f64>("cache-buffering-state", 0)
        .map_err(engine_error)?;

    Ok(handler)
}

/// Flags the observed-state machine is derived from.
struct Observed {
    is_paused: bool,
    is_idle: bool,
    ended: bool,
}

/// The primary execution loop for the MPV backend.
///
/// Alternates between draining pending requests and waiting briefly for MPV
/// events, until the request channel closes.
fn mpv_worker(
    mut handler: mpv::MpvHandler,
    request_rx: Receiver<Request>,
    status: Arc<Mutex<Status>>,
) {
    let mut sink: Option<EventSink> = None;
    let mut observed = Observed {
        is_paused: false,
        is_idle: true,
        ended: false,
    };

    while process_requests(&mut handler, &request_rx, &mut sink) {
        process_mpv_events(&mut handler, &mut observed, &status, sink.as_ref());
    }

    log::debug!("MPV worker stopping");
}

/// Executes all pending requests. Returns `false` once the channel is closed.
fn process_requests(
    handler: &mut mpv::MpvHandler,
    request_rx: &Receiver<Request>,
    sink: &mut Option<EventSink>,
) -> bool {
    loop {
        let request = match request_rx.try_recv() {
            Ok(request) => request,
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => return false,
        };

        match request {
            Request::AttachSink(new_sink) => *sink = Some(new_sink),
            Request::Command(args, reply_tx) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                let result = handler.command(&args).map_err(engine_error);
                let _ = reply_tx.send(result);
            }
            Request::Set(name, value, reply_tx) => {
                let result = match value {
                    Value::Flag(v) => handler.set_property(&name, v),
                    Value::Int(v) => handler.set_property(&name, v),
                    Value::Double(v) => handler.set_property(&name, v),
                    Value::Str(v) => handler.set_property(&name, v.as_str()),
                };
                let _ = reply_tx.send(result.map_err(engine_error));
            }
            Request::Get(name, kind, reply_tx) => {
                let result = match kind {
                    Kind::Flag => handler.get_property::<bool>(&name).map(Value::Flag),
                    Kind::Int => handler.get_property::<i64>(&name).map(Value::Int),
                    Kind::Double => handler.get_property::<f64>(&name).map(Value::Double),
                    Kind::Str => handler
                        .get_property::<&str>(&name)
                        .map(|v| Value::Str(v.to_string())),
                };
                let _ = reply_tx.send(result.map_err(engine_error));
            }
        }
    }
}

/// Polls for an MPV event and synchronizes the status snapshot.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    observed: &mut Observed,
    status: &Mutex<Status>,
    sink: Option<&EventSink>,
) {
    let Some(mpv_event) = handler.wait_event(EVENT_WAIT) else {
        return;
    };

    let mut status = status.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let event = match mpv_event {
        mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
            ("pause", Format::Flag(pause)) => {
                observed.is_paused = pause;
                None
            }
            ("idle-active", Format::Flag(idle_active)) => {
                observed.is_idle = idle_active;
                None
            }
            ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                status.time_ms = (seconds * 1000.0) as i64;
                Some(PlayerEvent::TimeChanged(status.time_ms))
            }
            ("percent-pos", Format::Double(percent)) => {
                status.position = (percent / 100.0) as f32;
                Some(PlayerEvent::PositionChanged(status.position))
            }
            ("duration", Format::Double(seconds)) => {
                status.length_ms = (seconds * 1000.0) as i64;
                Some(PlayerEvent::LengthChanged(status.length_ms))
            }
            ("seekable", Format::Flag(seekable)) => Some(PlayerEvent::SeekableChanged(seekable)),
            ("cache-buffering-state", Format::Double(percent)) if percent < 100.0 => {
                Some(PlayerEvent::Buffering(percent as f32))
            }
            _ => None,
        },
        mpv::Event::StartFile => {
            observed.ended = false;
            status.state = PlayerState::Opening;
            Some(PlayerEvent::Opening)
        }
        mpv::Event::EndFile(Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF)) => {
            observed.ended = true;
            status.state = PlayerState::Ended;
            Some(PlayerEvent::EndReached)
        }
        mpv::Event::EndFile(Err(_)) => {
            observed.ended = true;
            status.state = PlayerState::Error;
            Some(PlayerEvent::EncounteredError)
        }
        _ => None,
    };

    if let Some(new_state) = transport_state(observed, status.state) {
        if new_state != status.state {
            status.state = new_state;

            if let Some(sink) = sink {
                sink.emit(match new_state {
                    PlayerState::Playing => PlayerEvent::Playing,
                    PlayerState::Paused => PlayerEvent::Paused,
                    _ => PlayerEvent::Stopped,
                });
            }
        }
    }

    if let (Some(sink), Some(event)) = (sink, event) {
        sink.emit(event);
    }
}

/// Maps the observed MPV flags to a transport state.
///
/// Returns `None` while an ended or opening file should keep its state.
fn transport_state(observed: &Observed, current: PlayerState) -> Option<PlayerState> {
    if observed.is_idle {
        if observed.ended || matches!(current, PlayerState::NothingSpecial | PlayerState::Opening) {
            None
        } else {
            Some(PlayerState::Stopped)
        }
    } else if observed.is_paused {
        Some(PlayerState::Paused)
    } else {
        Some(PlayerState::Playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loadfile_index_from_version() {
        assert!(loadfile_takes_index("mpv v0.38.0"));
        assert!(loadfile_takes_index("mpv 0.39.0-dirty"));
        assert!(loadfile_takes_index("mpv v1.0.0"));
        assert!(!loadfile_takes_index("mpv 0.37.0"));
        assert!(!loadfile_takes_index("mpv 0.29.1"));
        assert!(!loadfile_takes_index("mpv git-2f1b0a2"));
    }

    #[test]
    fn stopped_or_ended_media_is_not_resumable() {
        let observed = Observed {
            is_paused: false,
            is_idle: true,
            ended: true,
        };

        // An ended file keeps its state while MPV idles, so play() reloads it.
        assert_eq!(transport_state(&observed, PlayerState::Ended), None);
        assert!(!PlayerState::Ended.is_active());
        assert_eq!(transport_state(&observed, PlayerState::Opening), None);
    }
}
