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

//! The playlist's media list.
//!
//! A single mutex guards the item vector; every read or mutation of list
//! membership happens under it, so concurrent callers observe a total order
//! over adds, removals and index lookups. Items are appended only, and
//! removing an index shifts every later item down by one.

use std::sync::{Mutex, MutexGuard};

use crate::model::{MediaId, MediaItem};

#[derive(Debug, Default)]
pub(crate) struct MediaList {
    items: Mutex<Vec<MediaItem>>,
}

impl MediaList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MediaItem>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Appends `item`, returning its index.
    pub(crate) fn push(&self, item: MediaItem) -> usize {
        let mut items = self.lock();
        items.push(item);
        items.len() - 1
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<MediaItem> {
        self.lock().get(index).cloned()
    }

    pub(crate) fn index_of(&self, id: MediaId) -> Option<usize> {
        self.lock().iter().position(|item| item.id() == id)
    }

    pub(crate) fn remove(&self, index: usize) -> Option<MediaItem> {
        let mut items = self.lock();
        if index < items.len() {
            Some(items.remove(index))
        } else {
            None
        }
    }

    /// Removes every item, last index first, returning them in removal order.
    pub(crate) fn clear(&self) -> Vec<MediaItem> {
        let mut items = self.lock();
        let mut removed = Vec::with_capacity(items.len());

        while let Some(item) = items.pop() {
            removed.push(item);
        }

        removed
    }

    pub(crate) fn items(&self) -> Vec<MediaItem> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(location: &str) -> MediaItem {
        MediaItem::from_location(location, &[]).unwrap()
    }

    #[test]
    fn push_returns_sequential_indices() {
        let list = MediaList::new();

        assert_eq!(list.push(item("a.mp4")), 0);
        assert_eq!(list.push(item("b.mp4")), 1);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn remove_shifts_later_items() {
        let list = MediaList::new();
        list.push(item("a.mp4"));
        let b = item("b.mp4");
        let b_id = b.id();
        list.push(b);

        assert_eq!(list.index_of(b_id), Some(1));
        assert_eq!(list.remove(0).unwrap().location(), "a.mp4");
        assert_eq!(list.index_of(b_id), Some(0));
    }

    #[test]
    fn remove_out_of_range_leaves_list_alone() {
        let list = MediaList::new();
        list.push(item("a.mp4"));

        assert!(list.remove(1).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn clear_removes_from_the_tail() {
        let list = MediaList::new();
        for location in ["a", "b", "c"] {
            list.push(item(location));
        }

        let removed: Vec<String> = list
            .clear()
            .iter()
            .map(|item| item.location().to_string())
            .collect();

        assert_eq!(removed, ["c", "b", "a"]);
        assert_eq!(list.len(), 0);
        assert_eq!(list.push(item("d")), 0);
    }
}
