//! GShare branch predictor.
//!
//! GShare correlates global branch history with the branch address using an
//! XOR hash, so the same branch can be predicted differently in different
//! execution contexts. This instance pairs the pattern table with a
//! jump-target map: a fetch address is only redirected once a taken branch
//! has been observed there, so the direction counters never invent targets.

use std::collections::{HashMap, VecDeque};

/// Depth of the global history ring.
pub const HISTORY_LEN: usize = 10;

/// Width of the pattern table index in bits.
const TABLE_BITS: usize = 9;
/// Number of pattern table entries.
const TABLE_SIZE: usize = 1 << TABLE_BITS;
/// Index mask for the pattern table.
const INDEX_MASK: u32 = (TABLE_SIZE as u32) - 1;
/// Reset value for the 2-bit counters (weakly taken).
const COUNTER_INIT: u8 = 2;
/// Saturation ceiling for the 2-bit counters.
const COUNTER_MAX: u8 = 3;

/// GShare predictor state: pattern table, history ring, and jump map.
pub struct GSharePredictor {
    /// 2-bit saturating counters indexed by `pc XOR history`.
    table: Vec<u8>,
    /// Global outcome history, most recent first.
    history: VecDeque<bool>,
    /// Most recently observed target per branching address.
    jump_map: HashMap<u32, u32>,
}

impl Default for GSharePredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl GSharePredictor {
    /// Creates a predictor with all-not-taken history and weakly-taken
    /// counters.
    pub fn new() -> Self {
        Self {
            table: vec![COUNTER_INIT; TABLE_SIZE],
            history: VecDeque::from(vec![false; HISTORY_LEN]),
            jump_map: HashMap::new(),
        }
    }

    /// Folds the history ring into an integer, oldest outcome at bit 0.
    fn history_bits(&self) -> u32 {
        self.history
            .iter()
            .rev()
            .enumerate()
            .fold(0u32, |acc, (i, &taken)| acc | (u32::from(taken) << i))
    }

    /// The pattern table index for a fetch address under the current
    /// history.
    pub fn index_of(&self, pc: u32) -> usize {
        (((pc & INDEX_MASK) ^ self.history_bits()) & INDEX_MASK) as usize
    }

    /// The raw counter value at a table index. Exposed for observability.
    pub fn counter(&self, idx: usize) -> u8 {
        self.table[idx & (TABLE_SIZE - 1)]
    }

    /// The recorded jump target for an address, if one has been observed.
    pub fn target_of(&self, pc: u32) -> Option<u32> {
        self.jump_map.get(&pc).copied()
    }

    /// Consults the predictor for a fetch at `pc`.
    ///
    /// Returns the redirect target iff the address has a recorded target
    /// and the indexed counter predicts taken (>= 2).
    pub fn predict(&self, pc: u32) -> Option<u32> {
        let target = self.target_of(pc)?;
        if self.counter(self.index_of(pc)) >= 2 {
            Some(target)
        } else {
            None
        }
    }

    /// Trains on a resolved branch outcome.
    ///
    /// Taken: bump the indexed counter toward saturation, record the
    /// target, shift `true` into history. Not taken: decay the counter,
    /// shift `false`. The counter update uses the pre-shift history, the
    /// same index the fetch-side prediction used.
    pub fn train(&mut self, pc: u32, taken: bool, target: u32) {
        let idx = self.index_of(pc);
        if taken {
            if self.table[idx] < COUNTER_MAX {
                self.table[idx] += 1;
            }
            self.jump_map.insert(pc, target);
        } else if self.table[idx] > 0 {
            self.table[idx] -= 1;
        }
        self.history.push_front(taken);
        self.history.truncate(HISTORY_LEN);
    }
}
