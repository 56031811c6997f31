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

//! Player event registration and delivery.
//!
//! Engines report state transitions by emitting [`PlayerEvent`]s into an
//! [`EventSink`]. The [`EventManager`] owns a dispatcher thread that drains
//! the sink's channel and invokes the listeners registered for each
//! [`EventKind`], so listener code never runs on the engine's own threads or
//! on the thread that called into the player.
//!
//! Listeners are either closures ([`EventManager::subscribe`]) or channels
//! ([`EventManager::subscribe_channel`]); both are removed with
//! [`EventManager::unsubscribe`].

use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    str::FromStr,
    sync::{
        Arc, Mutex, MutexGuard,
        mpsc::{self, Receiver, Sender},
    },
    thread::{self, JoinHandle},
};

use crate::{error::Error, model::MediaId};

/// The closed set of events a player can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    MediaChanged,
    NothingSpecial,
    Opening,
    Buffering,
    Playing,
    Paused,
    Stopped,
    Forward,
    Backward,
    EndReached,
    EncounteredError,
    TimeChanged,
    PositionChanged,
    SeekableChanged,
    PausableChanged,
    TitleChanged,
    LengthChanged,
}

impl EventKind {
    pub const ALL: [EventKind; 17] = [
        EventKind::MediaChanged,
        EventKind::NothingSpecial,
        EventKind::Opening,
        EventKind::Buffering,
        EventKind::Playing,
        EventKind::Paused,
        EventKind::Stopped,
        EventKind::Forward,
        EventKind::Backward,
        EventKind::EndReached,
        EventKind::EncounteredError,
        EventKind::TimeChanged,
        EventKind::PositionChanged,
        EventKind::SeekableChanged,
        EventKind::PausableChanged,
        EventKind::TitleChanged,
        EventKind::LengthChanged,
    ];

    /// The event name scripting hosts subscribe with.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::MediaChanged => "MediaPlayerMediaChanged",
            EventKind::NothingSpecial => "MediaPlayerNothingSpecial",
            EventKind::Opening => "MediaPlayerOpening",
            EventKind::Buffering => "MediaPlayerBuffering",
            EventKind::Playing => "MediaPlayerPlaying",
            EventKind::Paused => "MediaPlayerPaused",
            EventKind::Stopped => "MediaPlayerStopped",
            EventKind::Forward => "MediaPlayerForward",
            EventKind::Backward => "MediaPlayerBackward",
            EventKind::EndReached => "MediaPlayerEndReached",
            EventKind::EncounteredError => "MediaPlayerEncounteredError",
            EventKind::TimeChanged => "MediaPlayerTimeChanged",
            EventKind::PositionChanged => "MediaPlayerPositionChanged",
            EventKind::SeekableChanged => "MediaPlayerSeekableChanged",
            EventKind::PausableChanged => "MediaPlayerPausableChanged",
            EventKind::TitleChanged => "MediaPlayerTitleChanged",
            EventKind::LengthChanged => "MediaPlayerLengthChanged",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::InvalidValue(format!("unknown event: {}", s)))
    }
}

/// An event reported by a playback engine.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerEvent {
    MediaChanged(Option<MediaId>),
    NothingSpecial,
    Opening,
    /// Cache fill, 0-100.
    Buffering(f32),
    Playing,
    Paused,
    Stopped,
    Forward,
    Backward,
    EndReached,
    EncounteredError,
    /// Milliseconds.
    TimeChanged(i64),
    /// 0.0-1.0.
    PositionChanged(f32),
    SeekableChanged(bool),
    PausableChanged(bool),
    TitleChanged(i32),
    /// Milliseconds.
    LengthChanged(i64),
}

impl PlayerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PlayerEvent::MediaChanged(_) => EventKind::MediaChanged,
            PlayerEvent::NothingSpecial => EventKind::NothingSpecial,
            PlayerEvent::Opening => EventKind::Opening,
            PlayerEvent::Buffering(_) => EventKind::Buffering,
            PlayerEvent::Playing => EventKind::Playing,
            PlayerEvent::Paused => EventKind::Paused,
            PlayerEvent::Stopped => EventKind::Stopped,
            PlayerEvent::Forward => EventKind::Forward,
            PlayerEvent::Backward => EventKind::Backward,
            PlayerEvent::EndReached => EventKind::EndReached,
            PlayerEvent::EncounteredError => EventKind::EncounteredError,
            PlayerEvent::TimeChanged(_) => EventKind::TimeChanged,
            PlayerEvent::PositionChanged(_) => EventKind::PositionChanged,
            PlayerEvent::SeekableChanged(_) => EventKind::SeekableChanged,
            PlayerEvent::PausableChanged(_) => EventKind::PausableChanged,
            PlayerEvent::TitleChanged(_) => EventKind::TitleChanged,
            PlayerEvent::LengthChanged(_) => EventKind::LengthChanged,
        }
    }
}

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Arc<dyn Fn(&PlayerEvent) + Send + Sync>;

#[derive(Debug)]
enum Dispatch {
    Event(PlayerEvent),
    Shutdown,
}

/// The sending half handed to engines.
///
/// Emitting never blocks and never runs listener code on the caller's
/// thread.
#[derive(Clone)]
pub struct EventSink {
    tx: Sender<Dispatch>,
}

impl EventSink {
    pub fn emit(&self, event: PlayerEvent) {
        if self.tx.send(Dispatch::Event(event)).is_err() {
            log::trace!("Event dispatcher gone, dropping event");
        }
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink").finish_non_exhaustive()
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(ListenerId, EventKind, Callback)>,
}

/// Owns the listener registry and the dispatcher thread.
pub struct EventManager {
    registry: Arc<Mutex<Registry>>,
    sink: EventSink,
    dispatcher: Option<JoinHandle<()>>,
}

impl EventManager {
    /// Spawns the dispatcher thread and returns the manager.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<Dispatch>();
        let registry = Arc::new(Mutex::new(Registry::default()));

        let dispatcher = spawn_dispatcher(rx, Arc::clone(&registry));

        Self {
            registry,
            sink: EventSink { tx },
            dispatcher: Some(dispatcher),
        }
    }

    /// A sink feeding this manager's dispatcher.
    pub fn sink(&self) -> EventSink {
        self.sink.clone()
    }

    /// Registers `callback` for events of `kind`.
    ///
    /// The callback runs on the dispatcher thread. It may subscribe or
    /// unsubscribe listeners itself.
    pub fn subscribe<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&PlayerEvent) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);

        registry.next_id += 1;
        let id = ListenerId(registry.next_id);
        registry.listeners.push((id, kind, Arc::new(callback)));

        log::debug!("Subscribed listener {:?} to {}", id, kind);

        id
    }

    /// Registers a channel that receives a copy of every event of `kind`.
    ///
    /// The channel disconnects when the listener is unsubscribed.
    pub fn subscribe_channel(&self, kind: EventKind) -> (ListenerId, Receiver<PlayerEvent>) {
        let (tx, rx) = mpsc::channel();

        let id = self.subscribe(kind, move |event| {
            let _ = tx.send(event.clone());
        });

        (id, rx)
    }

    /// Removes a listener, returning whether it was registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut registry = lock(&self.registry);

        let before = registry.listeners.len();
        registry.listeners.retain(|(listener_id, _, _)| *listener_id != id);

        let removed = registry.listeners.len() != before;
        if removed {
            log::debug!("Unsubscribed listener {:?}", id);
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.registry).listeners.len()
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventManager {
    fn drop(&mut self) {
        let _ = self.sink.tx.send(Dispatch::Shutdown);

        if let Some(handle) = self.dispatcher.take() {
            // The last owner can be dropped from inside a listener.
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Spawns the thread that delivers events to listeners.
///
/// Matching callbacks are collected under the registry lock and invoked after
/// it is released. A panicking listener is logged and does not stop delivery
/// to the others.
fn spawn_dispatcher(rx: Receiver<Dispatch>, registry: Arc<Mutex<Registry>>) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(Dispatch::Event(event)) = rx.recv() {
            let kind = event.kind();

            let callbacks: Vec<Callback> = lock(&registry)
                .listeners
                .iter()
                .filter(|(_, listener_kind, _)| *listener_kind == kind)
                .map(|(_, _, callback)| Arc::clone(callback))
                .collect();

            for callback in callbacks {
                if panic::catch_unwind(AssertUnwindSafe(|| callback(&event))).is_err() {
                    log::warn!("Listener for {} panicked", kind);
                }
            }
        }

        log::debug!("Event dispatcher stopped");
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const WAIT: Duration = Duration::from_secs(2);

    #[test]
    fn event_names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(kind.name().parse::<EventKind>().unwrap(), kind);
        }
        assert!("MediaPlayerExploded".parse::<EventKind>().is_err());
    }

    #[test]
    fn delivers_only_matching_kind() {
        let manager = EventManager::new();
        let (_, rx) = manager.subscribe_channel(EventKind::TimeChanged);

        let sink = manager.sink();
        sink.emit(PlayerEvent::Playing);
        sink.emit(PlayerEvent::TimeChanged(1500));

        assert_eq!(rx.recv_timeout(WAIT).unwrap(), PlayerEvent::TimeChanged(1500));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn callbacks_run_on_dispatcher_thread() {
        let manager = EventManager::new();
        let (tx, rx) = mpsc::channel();

        manager.subscribe(EventKind::Playing, move |_| {
            let _ = tx.send(thread::current().id());
        });
        manager.sink().emit(PlayerEvent::Playing);

        let delivered_on = rx.recv_timeout(WAIT).unwrap();
        assert_ne!(delivered_on, thread::current().id());
    }

    #[test]
    fn unsubscribed_listener_receives_nothing() {
        let manager = EventManager::new();
        let (id, rx) = manager.subscribe_channel(EventKind::Stopped);

        assert!(manager.unsubscribe(id));
        assert!(!manager.unsubscribe(id));
        assert_eq!(manager.listener_count(), 0);

        manager.sink().emit(PlayerEvent::Stopped);

        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn panicking_listener_does_not_stop_delivery() {
        let manager = EventManager::new();
        manager.subscribe(EventKind::EndReached, |_| panic!("listener failure"));
        let (_, rx) = manager.subscribe_channel(EventKind::EndReached);

        manager.sink().emit(PlayerEvent::EndReached);
        manager.sink().emit(PlayerEvent::EndReached);

        assert_eq!(rx.recv_timeout(WAIT).unwrap(), PlayerEvent::EndReached);
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), PlayerEvent::EndReached);
    }

    #[test]
    fn sink_outlives_manager() {
        let manager = EventManager::new();
        let sink = manager.sink();
        drop(manager);

        sink.emit(PlayerEvent::Stopped);
    }
}
