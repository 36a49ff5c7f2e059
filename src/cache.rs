//! Response cache keyed by (endpoint, parameters), each entry carrying the tag
//! set of the read that produced it. Entries change after being stored only
//! through [`QueryCache::invalidate`] and [`QueryCache::clear`]. Reads nobody
//! watches are kept up to an idle limit, oldest dropped first.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;

use crate::api::{ApiRequest, Tag};

/// Identifies one cached read: the endpoint plus its rendered path and query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub endpoint: &'static str,
    pub path: String,
}

impl QueryKey {
    pub fn new(endpoint: &'static str, request: &ApiRequest) -> Self {
        Self {
            endpoint,
            path: request.path(),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    value: Value,
    tags: BTreeSet<Tag>,
    /// Enough to re-issue the read; the bearer token is attached at send time.
    request: ApiRequest,
    subscribers: usize,
    /// Order of the last store, for picking which idle entry goes first.
    stored_at: u64,
}

/// A read that must be re-issued after an invalidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refetch {
    pub key: QueryKey,
    pub request: ApiRequest,
}

/// Idle entries kept by [`QueryCache::new`].
pub const IDLE_LIMIT: usize = 64;

#[derive(Debug)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    idle_limit: usize,
    stores: u64,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::with_idle_limit(IDLE_LIMIT)
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache keeping at most `idle_limit` entries without subscribers.
    pub fn with_idle_limit(idle_limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            idle_limit,
            stores: 0,
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<&Value> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store the result of a network read. Existing subscribers are kept.
    pub fn store(&mut self, key: QueryKey, request: ApiRequest, tags: &[Tag], value: Value) {
        let mut request = request;
        request.bearer = None;
        let entry = self.entries.entry(key).or_insert_with(|| CacheEntry {
            value: Value::Null,
            tags: BTreeSet::new(),
            request: request.clone(),
            subscribers: 0,
            stored_at: 0,
        });
        self.stores += 1;
        entry.value = value;
        entry.tags = tags.iter().copied().collect();
        entry.request = request;
        entry.stored_at = self.stores;
        self.trim_idle();
    }

    /// Store the result of a re-issued read. Ignored if the entry has been
    /// evicted in the meantime.
    pub fn refresh(&mut self, key: &QueryKey, value: Value) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.value = value;
        }
    }

    /// Mark a read as active. Returns `false` if nothing is cached under `key`.
    pub fn subscribe(&mut self, key: &QueryKey) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.subscribers += 1;
                true
            }
            None => false,
        }
    }

    pub fn unsubscribe(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
            if entry.subscribers == 0 {
                self.trim_idle();
            }
        }
    }

    pub fn subscribers(&self, key: &QueryKey) -> usize {
        self.entries.get(key).map_or(0, |entry| entry.subscribers)
    }

    /// Invalidate every entry tagged with any of `tags`. Entries with active
    /// subscribers are kept (stale value intact) and returned for re-fetching;
    /// the rest are evicted.
    pub fn invalidate(&mut self, tags: &[Tag]) -> Vec<Refetch> {
        let mut refetch = Vec::new();
        self.entries.retain(|key, entry| {
            if !tags.iter().any(|tag| entry.tags.contains(tag)) {
                return true;
            }
            if entry.subscribers > 0 {
                refetch.push(Refetch {
                    key: key.clone(),
                    request: entry.request.clone(),
                });
                true
            } else {
                false
            }
        });
        refetch
    }

    /// Drop every entry, watched or not.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn trim_idle(&mut self) {
        let mut idle: Vec<(u64, QueryKey)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.subscribers == 0)
            .map(|(key, entry)| (entry.stored_at, key.clone()))
            .collect();
        if idle.len() <= self.idle_limit {
            return;
        }
        idle.sort_unstable_by_key(|(stored_at, _)| *stored_at);
        let excess = idle.len() - self.idle_limit;
        for (_, key) in idle.into_iter().take(excess) {
            trace!("Dropping idle read {}", key.path);
            self.entries.remove(&key);
        }
    }
}
