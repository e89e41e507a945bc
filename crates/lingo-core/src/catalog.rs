use crate::message::MessageEntry;
use std::collections::HashMap;
use std::sync::RwLock;

/// Concurrency-safe, in-memory mapping from language code to message entries.
///
/// Entries are immutable and replaced wholesale per language, so the lock
/// protects only the map itself: readers share a lock held for a single
/// access, writers hold it for the duration of one swap. A language mapped
/// to an empty list is a valid state (language exists, zero keys loaded).
#[derive(Debug, Default)]
pub struct Catalog {
    languages: RwLock<HashMap<String, Vec<MessageEntry>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the entry for `(language, key)`. Returns a copy.
    pub fn get(&self, language: &str, key: &str) -> Option<MessageEntry> {
        let map = self.languages.read().unwrap_or_else(|e| e.into_inner());
        map.get(language)
            .and_then(|entries| entries.iter().find(|e| e.key == key))
            .cloned()
    }

    /// Atomically swap the entry collection for one language.
    /// This is the only mutation primitive besides [`clear`](Self::clear).
    pub fn replace(&self, language: &str, entries: Vec<MessageEntry>) {
        let mut map = self.languages.write().unwrap_or_else(|e| e.into_inner());
        map.insert(language.to_string(), entries);
    }

    /// Drop every language. Used by bulk load before repopulating.
    pub fn clear(&self) {
        let mut map = self.languages.write().unwrap_or_else(|e| e.into_inner());
        map.clear();
    }

    pub fn contains(&self, language: &str) -> bool {
        let map = self.languages.read().unwrap_or_else(|e| e.into_inner());
        map.contains_key(language)
    }

    /// Snapshot of the loaded language codes.
    pub fn languages(&self) -> Vec<String> {
        let map = self.languages.read().unwrap_or_else(|e| e.into_inner());
        map.keys().cloned().collect()
    }

    /// Per-language entry counts, for observability.
    pub fn snapshot_sizes(&self) -> HashMap<String, usize> {
        let map = self.languages.read().unwrap_or_else(|e| e.into_inner());
        map.iter().map(|(k, v)| (k.clone(), v.len())).collect()
    }
}
