//! Multi-level LFU cache hierarchy.
//!
//! An ordered list of cache levels in front of the backing word store.
//! Each level tracks a per-key access count; when a level overflows, the
//! key with the minimum count is evicted. Reads recurse toward the backing
//! store and install the value at every level they missed in; writes go
//! through every level.
//!
//! The hierarchy never changes a program's architectural result. Its only
//! externally visible property is the access latency it accrues, reported
//! through the statistics block.

use std::collections::HashMap;

use crate::config::CacheLevelConfig;

/// A single cache level: bounded store, access metadata, and hit counters.
pub struct CacheLevel {
    capacity: usize,
    /// Cycles charged for probing this level.
    pub latency: u64,
    store: HashMap<u32, i32>,
    uses: HashMap<u32, u64>,
    /// Lookups satisfied by this level.
    pub hits: u64,
    /// Lookups that fell through to the next level.
    pub misses: u64,
}

impl CacheLevel {
    /// Creates an empty level. A zero capacity is clamped to one entry.
    pub fn new(capacity: usize, latency: u64) -> Self {
        Self {
            capacity: capacity.max(1),
            latency,
            store: HashMap::new(),
            uses: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Looks up a key, bumping its use count on a hit.
    fn lookup(&mut self, addr: u32) -> Option<i32> {
        match self.store.get(&addr) {
            Some(&v) => {
                *self.uses.entry(addr).or_insert(0) += 1;
                self.hits += 1;
                Some(v)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Installs a key, evicting the least-frequently-used entry if the
    /// level is at capacity.
    fn install(&mut self, addr: u32, val: i32) {
        if !self.store.contains_key(&addr) && self.store.len() >= self.capacity {
            if let Some(victim) = self.victim() {
                self.store.remove(&victim);
                self.uses.remove(&victim);
            }
        }
        self.store.insert(addr, val);
        self.uses.entry(addr).or_insert(0);
    }

    /// The key with the minimum use count, ties broken by address so
    /// eviction stays deterministic.
    fn victim(&self) -> Option<u32> {
        self.store
            .keys()
            .map(|&addr| (self.uses.get(&addr).copied().unwrap_or(0), addr))
            .min()
            .map(|(_, addr)| addr)
    }

    /// True if the key is currently resident.
    pub fn contains(&self, addr: u32) -> bool {
        self.store.contains_key(&addr)
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when no entries are resident.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

/// The ordered cache hierarchy, nearest level first.
pub struct CacheHierarchy {
    pub levels: Vec<CacheLevel>,
    /// Cycles charged when every level misses and the backing store answers.
    backing_latency: u64,
    /// Total latency accrued by reads through the hierarchy.
    pub latency_accrued: u64,
}

impl CacheHierarchy {
    /// Builds a hierarchy from per-level configuration, nearest level first.
    pub fn new(levels: &[CacheLevelConfig], backing_latency: u64) -> Self {
        Self {
            levels: levels
                .iter()
                .map(|c| CacheLevel::new(c.capacity, c.latency))
                .collect(),
            backing_latency,
            latency_accrued: 0,
        }
    }

    /// Reads a word through the hierarchy.
    ///
    /// Probes levels in order; on a hit the value is installed at every
    /// nearer level. On a full miss the backing store answers (0 for unset
    /// addresses) and the value is installed at every level.
    pub fn read(&mut self, addr: u32, backing: &HashMap<u32, i32>) -> i32 {
        let mut latency = 0;
        for i in 0..self.levels.len() {
            latency += self.levels[i].latency;
            if let Some(v) = self.levels[i].lookup(addr) {
                for level in &mut self.levels[..i] {
                    level.install(addr, v);
                }
                self.latency_accrued += latency;
                return v;
            }
        }
        let v = backing.get(&addr).copied().unwrap_or(0);
        latency += self.backing_latency;
        for level in &mut self.levels {
            level.install(addr, v);
        }
        self.latency_accrued += latency;
        v
    }

    /// Writes a word through every level.
    pub fn write(&mut self, addr: u32, val: i32) {
        for level in &mut self.levels {
            level.install(addr, val);
        }
    }
}
