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

//! Mapping engine-native track ids onto stable positional indices.

use crate::model::TrackDescription;

/// Returns the position of the first track whose id is `id`.
///
/// Scripting hosts address tracks by position in the description list, while
/// engines report and select them by id.
pub fn track_index_for_id(id: i32, tracks: &[TrackDescription]) -> Option<usize> {
    tracks.iter().position(|track| track.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks() -> Vec<TrackDescription> {
        vec![
            TrackDescription::new(-1, "Disable"),
            TrackDescription::new(3, "English"),
            TrackDescription::new(7, "Commentary"),
        ]
    }

    #[test]
    fn empty_list_has_no_index() {
        assert_eq!(track_index_for_id(-1, &[]), None);
        assert_eq!(track_index_for_id(0, &[]), None);
    }

    #[test]
    fn finds_position_of_id() {
        assert_eq!(track_index_for_id(-1, &tracks()), Some(0));
        assert_eq!(track_index_for_id(7, &tracks()), Some(2));
        assert_eq!(track_index_for_id(4, &tracks()), None);
    }

    #[test]
    fn first_duplicate_wins() {
        let mut tracks = tracks();
        tracks.push(TrackDescription::new(3, "English (SDH)"));

        assert_eq!(track_index_for_id(3, &tracks), Some(1));
    }
}
