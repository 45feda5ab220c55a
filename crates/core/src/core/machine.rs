//! The processor state record.
//!
//! One explicit struct holds everything a BatBridge machine is: the
//! register file, memory, halt flag, the pipeline latches, the fetch stall
//! counter, the optional branch predictor, the output sink, and the
//! statistics block. Step drivers transform this record in place; there is
//! no other mutable state anywhere in the simulator.

use crate::common::reg::RegisterFile;
use crate::config::{Config, CoreVariant};
use crate::core::pipeline::latches::Latches;
use crate::core::units::gshare::GSharePredictor;
use crate::devices::{OutputSink, StdoutSink};
use crate::mem::Memory;
use crate::stats::{CacheLevelStats, SimStats};

/// Complete architectural and micro-architectural machine state.
pub struct Machine {
    /// The 32 general-purpose registers; `r31` is the next fetch address.
    pub regs: RegisterFile,
    /// Word-addressed memory, optionally cache-backed.
    pub mem: Memory,
    /// Set when a halt command retires; the run loop stops here.
    pub halted: bool,
    /// Inter-stage latches.
    pub latches: Latches,
    /// Cycles the fetch stage must replay the current PC instead of
    /// advancing; 0 means not stalled.
    pub stall: u32,
    /// Branch predictor; present only on the predicted variant.
    pub predictor: Option<GSharePredictor>,
    /// Sink for the r29/r30 output side channels.
    pub sink: Box<dyn OutputSink>,
    /// Run statistics.
    pub stats: SimStats,
    /// Emit per-stage trace lines on stderr.
    pub trace: bool,
}

impl Machine {
    /// Builds a machine from configuration with an empty memory and a
    /// stdout-bound output sink.
    pub fn new(config: &Config) -> Self {
        Self::with_sink(config, Box::new(StdoutSink))
    }

    /// Builds a machine with a caller-supplied output sink.
    pub fn with_sink(config: &Config, sink: Box<dyn OutputSink>) -> Self {
        let mut regs = RegisterFile::new();
        regs.set_pc(config.general.start_pc);
        let predictor = match config.pipeline.variant {
            CoreVariant::Predicted => Some(GSharePredictor::new()),
            _ => None,
        };
        Self {
            regs,
            mem: Memory::with_cache(&config.cache),
            halted: false,
            latches: Latches::default(),
            stall: 0,
            predictor,
            sink,
            stats: SimStats::default(),
            trace: config.general.trace,
        }
    }

    /// Mirrors memory-hierarchy counters into the statistics block.
    ///
    /// Called by the simulator after a run so `stats` is self-contained.
    pub fn sync_stats(&mut self) {
        if let Some(h) = self.mem.hierarchy() {
            self.stats.mem_latency = h.latency_accrued;
            self.stats.cache_levels = h
                .levels
                .iter()
                .map(|l| CacheLevelStats {
                    hits: l.hits,
                    misses: l.misses,
                })
                .collect();
        }
    }

    /// Dumps machine state to stderr for post-mortem diagnosis.
    pub fn dump_state(&self) {
        eprintln!(
            "halted={} stall={} pc={:#x}",
            self.halted,
            self.stall,
            self.regs.pc()
        );
        self.regs.dump();
        if let Some(entry) = &self.latches.fetch {
            eprintln!("fetch.result   pc={:#x} word={:#010x}", entry.pc, entry.word);
        }
        if let Some(inst) = &self.latches.decode {
            eprintln!(
                "decode.result  pc={:#x} {}",
                inst.pc,
                crate::isa::disasm::disasm(inst)
            );
        }
        if let Some(cmd) = &self.latches.execute {
            eprintln!(
                "execute.result pc={:#x} {:?} addr={:#x} val={}",
                cmd.pc, cmd.dst, cmd.addr, cmd.val
            );
        }
        if !self.latches.decode_ops.is_empty() {
            eprintln!("decode.ops     {} pending", self.latches.decode_ops.len());
        }
    }
}
