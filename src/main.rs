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

//! # Headless playlist player.
//!
//! A line-driven front end for [`PlaylistPlayer`] on top of MPV.
//!
//! Locations given on the command line are appended to the playlist after
//! the stored configuration is applied. Commands are then read from standard
//! input, one per line (`help` lists them).
//!
//! ## Architecture
//!
//! * The **Main Thread** executes commands against the player.
//! * An **Input Thread** reads standard input and forwards each line.
//! * Player events arrive on the event dispatcher thread and are forwarded
//!   into the same channel, so output is written from one place.

use std::{
    io::{self, BufRead},
    sync::mpsc::{self, Sender},
    thread,
};

use anyhow::{Context, Result, bail};
use media_list_player::{
    EventKind, MetaKey, PlaybackMode, PlayerEvent, PlaylistPlayer, config, engine::mpv::MpvEngine,
};

enum Input {
    Line(String),
    Event(PlayerEvent),
    Eof,
}

const HELP: &str = "\
add <location> [option...]  append to the playlist
play [index]                play, or play the item at index
pause | toggle | stop       transport
next | prev                 step through the playlist
remove <index> | clear      edit the playlist
list                        show the playlist
volume <0-200> | mute       audio
seek <seconds>              jump to a time
loop <off|all|one>          playback mode
status                      show what is playing
quit";

fn main() -> Result<()> {
    env_logger::init();

    let config = config::load_config();

    let engine = MpvEngine::new().context("Failed to start MPV")?;
    let player =
        PlaylistPlayer::open_with_config(engine, &config).context("Failed to open player")?;

    for location in std::env::args().skip(1) {
        player
            .add_item(&location, &[])
            .with_context(|| format!("Failed to add {}", location))?;
    }

    if player.items_count() > 0 && !player.is_playing() {
        player.play().context("Failed to start playback")?;
    }

    let (input_tx, input_rx) = mpsc::channel();

    forward_events(&player, &input_tx);
    spawn_input_reader(input_tx);

    while let Ok(input) = input_rx.recv() {
        match input {
            Input::Line(line) => match execute(&player, line.trim()) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => eprintln!("error: {:#}", e),
            },
            Input::Event(event) => report_event(&player, &event),
            Input::Eof => break,
        }
    }

    player.stop().ok();

    Ok(())
}

/// Forwards the events worth reporting into the input channel.
fn forward_events(player: &PlaylistPlayer<MpvEngine>, input_tx: &Sender<Input>) {
    for kind in [
        EventKind::MediaChanged,
        EventKind::EndReached,
        EventKind::EncounteredError,
    ] {
        let tx = input_tx.clone();
        player.add_event_listener(kind, move |event| {
            let _ = tx.send(Input::Event(event.clone()));
        });
    }
}

/// Spawns a thread to translate standard input lines to inputs.
fn spawn_input_reader(input_tx: Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if input_tx.send(Input::Line(line)).is_err() {
                        return;
                    }
                }
                Err(_) => break,
            }
        }
        let _ = input_tx.send(Input::Eof);
    });
}

fn report_event(player: &PlaylistPlayer<MpvEngine>, event: &PlayerEvent) {
    match event {
        PlayerEvent::MediaChanged(_) => {
            if let Some(index) = player.current_item_index() {
                println!("now playing #{}", index);
            }
        }
        PlayerEvent::EndReached => println!("end reached"),
        PlayerEvent::EncounteredError => println!("playback error"),
        _ => {}
    }
}

/// Executes one command line. Returns `false` when the user asked to quit.
fn execute(player: &PlaylistPlayer<MpvEngine>, line: &str) -> Result<bool> {
    let mut words = line.split_whitespace();

    let Some(command) = words.next() else {
        return Ok(true);
    };

    match command {
        "add" => {
            let location = words.next().context("add needs a location")?;
            let options: Vec<String> = words.map(str::to_string).collect();
            let index = player.add_item(location, &options)?;
            println!("added #{}", index);
        }
        "play" => match words.next() {
            Some(index) => player.play_item(index.parse().context("invalid index")?)?,
            None => player.play()?,
        },
        "pause" => player.pause()?,
        "toggle" => player.toggle_pause()?,
        "stop" => player.stop()?,
        "next" => {
            if !player.next()? {
                println!("already at the last item");
            }
        }
        "prev" => {
            if !player.prev()? {
                println!("already at the first item");
            }
        }
        "remove" => {
            let index = words.next().context("remove needs an index")?;
            if !player.remove_item(index.parse().context("invalid index")?) {
                bail!("no item at {}", index);
            }
        }
        "clear" => player.clear(),
        "list" => {
            let current = player.current_item_index();
            for (index, item) in player.items().iter().enumerate() {
                let marker = if Some(index) == current { '>' } else { ' ' };
                println!("{} {:>3} {}", marker, index, item.location());
            }
        }
        "volume" => {
            let volume = words.next().context("volume needs a value")?;
            player.set_volume(volume.parse().context("invalid volume")?)?;
        }
        "mute" => player.toggle_mute()?,
        "seek" => {
            let seconds: f64 = words
                .next()
                .context("seek needs a time")?
                .parse()
                .context("invalid time")?;
            player.set_time_ms((seconds * 1000.0) as i64)?;
        }
        "loop" => {
            let mode = match words.next() {
                Some("off") => PlaybackMode::Default,
                Some("all") => PlaybackMode::Loop,
                Some("one") => PlaybackMode::Repeat,
                _ => bail!("loop takes off, all or one"),
            };
            player.set_playback_mode(mode);
        }
        "status" => print_status(player),
        "help" => println!("{}", HELP),
        "quit" | "exit" => return Ok(false),
        other => bail!("unknown command: {} (try help)", other),
    }

    Ok(true)
}

fn print_status(player: &PlaylistPlayer<MpvEngine>) {
    let Some(index) = player.current_item_index() else {
        println!("{:?}, nothing loaded", player.state());
        return;
    };

    let title = player
        .media_meta(MetaKey::Title)
        .unwrap_or_else(|| "(untitled)".to_string());

    println!(
        "{:?} #{} {} [{} / {} s] volume {}{}",
        player.state(),
        index,
        title,
        player.time_ms() / 1000,
        player.length_ms() / 1000,
        player.volume(),
        if player.is_muted() { " (muted)" } else { "" },
    );
}
