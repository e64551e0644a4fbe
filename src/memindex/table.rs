//! MemIndex implementation
//!
//! HashMap from key bytes to on-disk locations.

use std::collections::HashMap;

use crate::offset::StorageOffset;

use super::IndexEntry;

/// In-memory map of key → on-disk location
#[derive(Debug, Default)]
pub struct MemIndex {
    entries: HashMap<Vec<u8>, IndexEntry>,
}

impl MemIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key
    pub fn get(&self, key: &[u8]) -> Option<IndexEntry> {
        self.entries.get(key).copied()
    }

    /// Insert or replace the entry for a key
    ///
    /// Returns the previous entry, if any.
    pub fn insert(&mut self, key: Vec<u8>, entry: IndexEntry) -> Option<IndexEntry> {
        self.entries.insert(key, entry)
    }

    /// Point an existing key at a new value
    ///
    /// Returns false if the key is not present.
    pub fn set_value_offset(&mut self, key: &[u8], value_offset: StorageOffset) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.value_offset = value_offset;
                true
            }
            None => false,
        }
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All live keys, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.keys().map(|k| k.as_slice())
    }
}
