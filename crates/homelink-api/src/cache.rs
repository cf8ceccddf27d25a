// Read cache for GET resources, keyed by resource path.
//
// The cache owns raw JSON payloads only -- parsed domain objects are
// the caller's. Concurrent writers race benignly: last writer wins on
// the entry timestamp.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;

/// Cache policy for a GET request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Serve a young cache entry if one exists, refreshing it in the
    /// background; fetch synchronously otherwise.
    Cached,
    /// Bypass the cache and ask the controller directly.
    Fresh,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    fetched_at: Instant,
}

pub(crate) struct ReadCache {
    entries: DashMap<String, CacheEntry>,
    max_age: Duration,
}

impl ReadCache {
    pub(crate) fn new(max_age: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_age,
        }
    }

    /// The cached value for `path`, if it is younger than the window.
    pub(crate) fn get_if_young(&self, path: &str) -> Option<Value> {
        let entry = self.entries.get(path)?;
        (entry.fetched_at.elapsed() < self.max_age).then(|| entry.value.clone())
    }

    pub(crate) fn store(&self, path: &str, value: &Value) {
        self.entries.insert(
            path.to_owned(),
            CacheEntry {
                value: value.clone(),
                fetched_at: Instant::now(),
            },
        );
    }
}
