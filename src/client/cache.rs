//! Query-keyed snapshot cache for the client calendar view.
//!
//! Keys are query signatures (`EventFilter::signature()`); values are
//! immutable snapshots behind `Arc`, so readers hold a consistent list
//! while writers swap in a new version. Every write bumps the entry's
//! version; read generations let in-flight fetches detect that a
//! mutation started after them and discard their stale result.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::domain::event::EventCategory;
use crate::domain::foundation::{BookingId, EventId, Timestamp};

/// Client-side view of one calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSnapshot {
    pub event_id: EventId,
    pub title: String,
    pub date: Timestamp,
    pub location: String,
    pub category: EventCategory,
    pub capacity: u32,
    pub attendee_count: u32,
    pub is_booked: bool,
    pub booking_id: Option<BookingId>,
}

struct CacheEntry {
    events: Arc<Vec<EventSnapshot>>,
    /// Bumped on every write; lets observers detect change.
    version: u64,
    /// Bumped when a mutation invalidates in-flight reads.
    generation: u64,
}

/// Snapshot cache keyed by query signature.
#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoning leaves the map structurally intact; recover the guard
    // rather than propagate a panic into every caller.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current snapshot for a key, if one has been stored.
    pub fn get(&self, key: &str) -> Option<Arc<Vec<EventSnapshot>>> {
        self.lock().get(key).map(|e| Arc::clone(&e.events))
    }

    /// Current write version for a key. `None` until first store.
    pub fn version(&self, key: &str) -> Option<u64> {
        self.lock().get(key).map(|e| e.version)
    }

    /// Generation a read should carry; compared again at completion.
    pub fn read_generation(&self, key: &str) -> u64 {
        self.lock().get(key).map(|e| e.generation).unwrap_or(0)
    }

    /// Invalidates in-flight reads for a key. Called at the start of a
    /// mutation so a fetch that raced the optimistic write cannot
    /// clobber it with pre-mutation data.
    pub fn invalidate(&self, key: &str) -> u64 {
        let mut entries = self.lock();
        let entry = entries.entry(key.to_string()).or_insert_with(empty_entry);
        entry.generation += 1;
        entry.generation
    }

    /// Stores a completed read, unless the key's generation moved on
    /// since the read began. Returns whether the result was kept.
    pub fn complete_read(
        &self,
        key: &str,
        generation: u64,
        events: Vec<EventSnapshot>,
    ) -> bool {
        let mut entries = self.lock();
        let entry = entries.entry(key.to_string()).or_insert_with(empty_entry);
        if entry.generation != generation {
            return false;
        }
        entry.events = Arc::new(events);
        entry.version += 1;
        true
    }

    /// Unconditionally stores an authoritative snapshot for a key.
    pub fn store(&self, key: &str, events: Vec<EventSnapshot>) {
        let mut entries = self.lock();
        let entry = entries.entry(key.to_string()).or_insert_with(empty_entry);
        entry.events = Arc::new(events);
        entry.version += 1;
    }

    /// Copy of one cached entry, taken before an optimistic transform
    /// so a failed mutation can restore it exactly.
    pub fn snapshot_event(&self, key: &str, event_id: &EventId) -> Option<EventSnapshot> {
        self.lock()
            .get(key)?
            .events
            .iter()
            .find(|s| &s.event_id == event_id)
            .cloned()
    }

    /// Applies a transform to one entry under a key. Returns whether the
    /// entry existed.
    pub fn transform_event(
        &self,
        key: &str,
        event_id: &EventId,
        f: impl FnOnce(&mut EventSnapshot),
    ) -> bool {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(key) else {
            return false;
        };
        let mut events: Vec<EventSnapshot> = entry.events.as_ref().clone();
        let Some(target) = events.iter_mut().find(|s| &s.event_id == event_id) else {
            return false;
        };
        f(target);
        entry.events = Arc::new(events);
        entry.version += 1;
        true
    }

    /// Restores one entry to a previously taken snapshot. Only the
    /// matching entry is touched; entries settled by other mutations
    /// keep their state.
    pub fn restore_event(&self, key: &str, snapshot: EventSnapshot) {
        let id = snapshot.event_id;
        self.transform_event(key, &id, |s| *s = snapshot);
    }

    /// Merges an authoritative record into every cached list holding the
    /// same event id. Idempotent: applying the same record twice leaves
    /// the cache unchanged.
    pub fn apply_remote(&self, record: &EventSnapshot) {
        let mut entries = self.lock();
        for entry in entries.values_mut() {
            if !entry.events.iter().any(|s| s.event_id == record.event_id) {
                continue;
            }
            let mut events: Vec<EventSnapshot> = entry.events.as_ref().clone();
            for s in events.iter_mut() {
                if s.event_id == record.event_id {
                    *s = record.clone();
                }
            }
            entry.events = Arc::new(events);
            entry.version += 1;
        }
    }
}

fn empty_entry() -> CacheEntry {
    CacheEntry {
        events: Arc::new(Vec::new()),
        version: 0,
        generation: 0,
    }
}
