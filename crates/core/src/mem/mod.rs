//! Word-addressed memory.
//!
//! A sparse map from 32-bit addresses to 32-bit words, shared by
//! instructions and data (Von Neumann). Unset addresses read 0, which makes
//! a jump into unloaded memory execute `hlt` (opcode 0) and halt cleanly.
//! Every access address is normalized down to a multiple of 4.
//!
//! The store can optionally sit behind a multi-level LFU cache hierarchy
//! (see [`crate::core::units::cache`]); the hierarchy affects latency
//! accounting only, never values.

use std::collections::HashMap;

use crate::config::CacheConfig;
use crate::core::units::cache::CacheHierarchy;

/// Rounds an address down to its word boundary.
#[inline]
pub fn normalize(addr: u32) -> u32 {
    addr & !3
}

/// The machine's word store, optionally cache-backed.
pub struct Memory {
    words: HashMap<u32, i32>,
    hierarchy: Option<CacheHierarchy>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Creates an empty, uncached memory.
    pub fn new() -> Self {
        Self {
            words: HashMap::new(),
            hierarchy: None,
        }
    }

    /// Creates a memory with the configured cache hierarchy in front of it.
    ///
    /// An empty level list leaves the store uncached.
    pub fn with_cache(config: &CacheConfig) -> Self {
        let hierarchy = if config.levels.is_empty() {
            None
        } else {
            Some(CacheHierarchy::new(&config.levels, config.memory_latency))
        };
        Self {
            words: HashMap::new(),
            hierarchy,
        }
    }

    /// Reads the word at `addr` (normalized); 0 if unset.
    pub fn read(&mut self, addr: u32) -> i32 {
        let addr = normalize(addr);
        match &mut self.hierarchy {
            Some(h) => h.read(addr, &self.words),
            None => self.words.get(&addr).copied().unwrap_or(0),
        }
    }

    /// Writes the word at `addr` (normalized), through every cache level.
    pub fn write(&mut self, addr: u32, val: i32) {
        let addr = normalize(addr);
        if let Some(h) = &mut self.hierarchy {
            h.write(addr, val);
        }
        self.words.insert(addr, val);
    }

    /// Installs an instruction word, bypassing the cache hierarchy.
    ///
    /// Used by the loader before the machine starts stepping.
    pub fn load_word(&mut self, addr: u32, word: u32) {
        self.words.insert(normalize(addr), word as i32);
    }

    /// The raw backing image, for oracle comparison in tests.
    pub fn image(&self) -> &HashMap<u32, i32> {
        &self.words
    }

    /// The cache hierarchy, if one is configured.
    pub fn hierarchy(&self) -> Option<&CacheHierarchy> {
        self.hierarchy.as_ref()
    }
}
