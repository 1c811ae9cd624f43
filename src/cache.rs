//! Ephemeral TTL cache for listing fetch results.
//!
//! An explicit instance owned by whoever orchestrates fetches — constructed
//! at startup, dropped at shutdown — never a process-wide global. Entries
//! expire individually; capacity is bounded by evicting the entry closest to
//! expiry.

use ahash::AHashMap;
use serde::Serialize;
use std::hash::Hash;
use std::time::{Duration, Instant};

use log::debug;

/// Cache key for a listings search, derived from the parameters that change
/// the result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey(String);

impl SearchKey {
    pub fn new(
        latitude: f64,
        longitude: f64,
        bedrooms: Option<u32>,
        bathrooms: Option<f64>,
        radius_miles: f64,
        days_old: Option<&str>,
    ) -> Self {
        #[derive(Serialize)]
        struct KeyParts<'a> {
            lat: f64,
            lon: f64,
            beds: Option<u32>,
            baths: Option<f64>,
            radius: f64,
            days_old: Option<&'a str>,
        }
        let parts = KeyParts {
            lat: latitude,
            lon: longitude,
            beds: bedrooms,
            baths: bathrooms,
            radius: radius_miles,
            days_old,
        };
        // Serialization of a flat struct with no map keys cannot fail.
        SearchKey(serde_json::to_string(&parts).unwrap_or_default())
    }
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

pub struct TtlCache<K, V> {
    entries: AHashMap<K, Entry<V>>,
    ttl: Duration,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> TtlCache<K, V> {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: AHashMap::new(),
            ttl,
            capacity,
        }
    }

    /// Look up a live entry. Expired entries are removed on access.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.expires_at <= Instant::now(),
            None => {
                debug!("cache miss");
                return None;
            }
        };
        if expired {
            debug!("cache entry expired");
            self.entries.remove(key);
            return None;
        }
        debug!("cache hit");
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.purge_expired();
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            // At capacity: drop the entry that would expire soonest.
            if let Some(evict) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.expires_at)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&evict);
            }
        }
        self.entries.insert(
            key,
            Entry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    pub fn purge_expired(&mut self) {
        let now = Instant::now();
        self.entries.retain(|_, e| e.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
