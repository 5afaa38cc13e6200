use dashmap::DashMap;
use log::debug;
use std::time::{Duration, Instant};
use super::metrics::CACHED_WORD_SETS;
use super::words::WordSet;

struct CachedWordSet {
    set: WordSet,
    stored_at: Instant,
}

// Most recent word set issued to each account, bounded by a TTL and a capacity
pub struct WordSetCache {
    entries: DashMap<String, CachedWordSet>,
    ttl: Duration,
    capacity: usize,
}

impl WordSetCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        WordSetCache {
            entries: DashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Stores the set for the account, replacing any previous one
    pub fn insert(&self, account_id: &str, set: WordSet) {
        self.insert_at(account_id, set, Instant::now());
    }

    pub fn insert_at(&self, account_id: &str, set: WordSet, now: Instant) {
        if !self.entries.contains_key(account_id) && self.entries.len() >= self.capacity {
            self.purge_expired_at(now);
            if self.entries.len() >= self.capacity {
                self.evict_oldest();
            }
        }
        self.entries.insert(account_id.to_string(), CachedWordSet { set, stored_at: now });
        CACHED_WORD_SETS.set(self.entries.len() as f64);
    }

    // Returns the account's last set while it is still fresh
    pub fn get(&self, account_id: &str) -> Option<WordSet> {
        self.get_at(account_id, Instant::now())
    }

    pub fn get_at(&self, account_id: &str, now: Instant) -> Option<WordSet> {
        let fresh = self
            .entries
            .get(account_id)
            .map(|entry| (self.is_fresh(entry.value(), now), entry.set.clone()));

        match fresh {
            Some((true, set)) => Some(set),
            Some((false, _)) => {
                self.remove_expired(account_id, now);
                None
            }
            None => None,
        }
    }

    // Rechecks under the shard lock so a set stored after the read survives
    fn remove_expired(&self, account_id: &str, now: Instant) -> bool {
        let removed = self
            .entries
            .remove_if(account_id, |_, entry| !self.is_fresh(entry, now))
            .is_some();
        CACHED_WORD_SETS.set(self.entries.len() as f64);
        removed
    }

    fn is_fresh(&self, entry: &CachedWordSet, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) < self.ttl
    }

    // Drops every expired entry and returns how many were removed
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| self.is_fresh(entry, now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!("Purged {} expired word sets", removed);
        }
        CACHED_WORD_SETS.set(self.entries.len() as f64);
        removed
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.stored_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}
