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

//! Player configuration.
//!
//! This module manages the player configuration file: the startup settings a
//! host would otherwise pass as embedding parameters (initial target,
//! autoplay, looping, mute and volume).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

const CONFIG_NAME: &str = "media-list-player";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub version: u32,
    /// Start playing `target` as soon as it is enqueued.
    pub autoplay: bool,
    /// Wrap around to the first item after the last one ends.
    pub autoloop: bool,
    pub mute: bool,
    /// Initial volume, applied only when within 0-200.
    pub volume: Option<u32>,
    /// Location enqueued when the configuration is applied.
    pub target: Option<String>,
    /// One-shot options attached to `target`.
    pub target_options: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            autoplay: false,
            autoloop: false,
            mute: false,
            volume: None,
            target: None,
            target_options: vec![],
        }
    }
}

pub fn load_config() -> PlayerConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_else(|e| {
        log::warn!("Using default configuration: {}", e);
        PlayerConfig::default()
    })
}

pub fn save_config(cfg: &PlayerConfig) -> Result<()> {
    confy::store(CONFIG_NAME, None, cfg)?;
    Ok(())
}

pub fn load_config_from(path: impl AsRef<Path>) -> Result<PlayerConfig> {
    Ok(confy::load_path(path)?)
}

pub fn save_config_to(path: impl AsRef<Path>, cfg: &PlayerConfig) -> Result<()> {
    confy::store_path(path, cfg)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player.toml");

        let cfg = PlayerConfig {
            autoplay: true,
            autoloop: true,
            volume: Some(120),
            target: Some("http://example.org/live.ts".to_string()),
            target_options: vec![":network-caching=300".to_string()],
            ..PlayerConfig::default()
        };

        save_config_to(&path, &cfg).unwrap();

        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert_eq!(load_config_from(&path).unwrap(), PlayerConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "mute = true\n").unwrap();

        let cfg = load_config_from(&path).unwrap();

        assert!(cfg.mute);
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.target, None);
    }
}
