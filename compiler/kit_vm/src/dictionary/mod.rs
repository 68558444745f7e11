//! The dictionary: an append-only, insertion-ordered table of entries.
//!
//! Lookup scans from the newest entry to the oldest and returns the first
//! name match. Redefining a name therefore shadows the old entry without
//! invalidating it: compiled bodies hold [`EntryId`]s, not names, so they
//! keep running whatever they were compiled against.
//!
//! There is no deletion. Entries live until the dictionary is dropped; a
//! definition abandoned by an error is hidden from lookup instead.

use std::fmt;

use crate::entry::{bounded_name, Entry};
use crate::value::NativeRoutine;

/// Stable handle to an entry, minted by [`Dictionary::add`].
///
/// An id is only meaningful for the dictionary that produced it. It wraps
/// the entry's position, so every entry the dictionary can hold gets a
/// distinct id.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

impl EntryId {
    /// Position of the entry, oldest first.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Every entry of one machine, oldest first.
#[derive(Clone, Default)]
pub struct Dictionary {
    entries: Vec<Entry>,
}

impl Dictionary {
    /// An empty dictionary.
    pub fn new() -> Self {
        Dictionary::default()
    }

    /// Append a new incomplete, non-immediate entry.
    pub fn add(&mut self, name: &str) -> EntryId {
        let id = EntryId(self.entries.len());
        self.entries.push(Entry::new(name));
        id
    }

    /// Append an entry backed by a native routine.
    pub fn add_native(&mut self, name: &str, routine: NativeRoutine) -> EntryId {
        let id = self.add(name);
        self.get_mut(id).set_routine(routine);
        id
    }

    /// Append an immediate entry backed by a native routine.
    pub fn add_immediate(&mut self, name: &str, routine: NativeRoutine) -> EntryId {
        let id = self.add_native(name, routine);
        self.get_mut(id).set_immediate(true);
        id
    }

    /// Newest entry named `name`, if any. Hidden entries are skipped.
    pub fn find(&self, name: &str) -> Option<EntryId> {
        let name = bounded_name(name);
        self.entries
            .iter()
            .rposition(|entry| !entry.is_hidden() && entry.name() == name)
            .map(EntryId)
    }

    /// The most recently added entry.
    pub fn latest(&self) -> Option<EntryId> {
        self.entries
            .len()
            .checked_sub(1)
            .map(EntryId)
    }

    /// The entry behind `id`, hidden or not.
    #[inline]
    pub fn get(&self, id: EntryId) -> &Entry {
        &self.entries[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: EntryId) -> &mut Entry {
        &mut self.entries[id.index()]
    }

    /// Number of entries, shadowed and hidden ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names visible to lookup, newest first, each listed once.
    pub fn visible_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in self.entries.iter().rev().filter(|entry| !entry.is_hidden()) {
            if !names.contains(&entry.name()) {
                names.push(entry.name());
            }
        }
        names
    }
}
