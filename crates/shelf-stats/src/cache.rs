use std::sync::{Arc, Mutex};

use chrono::Datelike;
use shelf_types::Timestamp;
use tracing::debug;

use crate::statistics::Statistics;

/// Cache key: statistics depend on the collection contents (store
/// version) and on which calendar year is "this year".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CacheKey {
    version: u64,
    year: i32,
}

/// Single-entry statistics cache keyed by store version.
///
/// Any mutation bumps the store version, which makes the cached entry
/// stale; so does the turn of the year.
#[derive(Default)]
pub struct StatsCache {
    entry: Mutex<Option<(CacheKey, Arc<Statistics>)>>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached statistics for this version and year, if present.
    pub fn get(&self, version: u64, now: Timestamp) -> Option<Arc<Statistics>> {
        let key = CacheKey {
            version,
            year: now.year(),
        };
        let entry = self.entry.lock().expect("stats cache poisoned");
        match entry.as_ref() {
            Some((cached, stats)) if *cached == key => Some(Arc::clone(stats)),
            _ => None,
        }
    }

    /// Store statistics computed from the snapshot at `version`.
    pub fn put(&self, version: u64, now: Timestamp, stats: Statistics) -> Arc<Statistics> {
        let key = CacheKey {
            version,
            year: now.year(),
        };
        let stats = Arc::new(stats);
        let mut entry = self.entry.lock().expect("stats cache poisoned");
        // Never replace a newer entry with an older one.
        if entry.as_ref().map_or(true, |(cached, _)| cached.version <= version) {
            *entry = Some((key, Arc::clone(&stats)));
            debug!(version, "statistics cached");
        }
        stats
    }
}

impl std::fmt::Debug for StatsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entry = self.entry.lock().expect("stats cache poisoned");
        f.debug_struct("StatsCache")
            .field("cached_version", &entry.as_ref().map(|(key, _)| key.version))
            .finish()
    }
}
