//! Transposition cache: exact scores keyed by (position key, remaining depth).
//!
//! An entry is only reused at the depth it was computed for. Mate scores
//! are stored relative to the node that produced them and converted back
//! on probe, so a mate found at one ply reads correctly at another.

use std::collections::HashMap;

use log::warn;

use crate::config::CacheConfig;
use crate::score::{MATE_BOUND, Score};

#[derive(Debug, Clone, Copy)]
struct Entry {
    score: Score,
    generation: u32,
}

#[derive(Debug)]
pub struct TranspositionCache {
    entries: HashMap<(u64, u8), Entry>,
    capacity: Option<usize>,
    /// Bumped per search; entries from older searches are evicted first
    generation: u32,
    enabled: bool,
}

impl TranspositionCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: config.capacity,
            generation: 0,
            enabled: config.enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Marks the start of a search.
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Score for `key` at exactly `depth`, as seen from a node `ply` plies
    /// below the root.
    pub fn probe(&self, key: u64, depth: u8, ply: u32) -> Option<Score> {
        if !self.enabled {
            return None;
        }
        self.entries
            .get(&(key, depth))
            .map(|e| from_cached(e.score, ply))
    }

    pub fn store(&mut self, key: u64, depth: u8, score: Score, ply: u32) {
        if !self.enabled {
            return;
        }
        if let Some(capacity) = self.capacity
            && self.entries.len() >= capacity
            && !self.entries.contains_key(&(key, depth))
        {
            self.evict(capacity);
        }
        self.entries.insert(
            (key, depth),
            Entry {
                score: to_cached(score, ply),
                generation: self.generation,
            },
        );
    }

    fn evict(&mut self, capacity: usize) {
        let before = self.entries.len();
        let current = self.generation;
        self.entries.retain(|_, e| e.generation == current);
        if self.entries.len() >= capacity {
            self.entries.clear();
        }
        warn!(
            "transposition cache full ({capacity} entries): evicted {} entries",
            before - self.entries.len()
        );
    }
}

fn to_cached(score: Score, ply: u32) -> Score {
    let ply = ply as Score;
    if score > MATE_BOUND {
        score + ply
    } else if score < -MATE_BOUND {
        score - ply
    } else {
        score
    }
}

fn from_cached(score: Score, ply: u32) -> Score {
    let ply = ply as Score;
    if score > MATE_BOUND {
        score - ply
    } else if score < -MATE_BOUND {
        score + ply
    } else {
        score
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod cache_tests;
