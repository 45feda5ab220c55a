//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for a run. It provides:
//! 1. **Cycle and CPI:** Total cycles, retired instructions, derived CPI.
//! 2. **Instruction mix:** Counts by retirement class (ALU, store, branch,
//!    output side channel, halt).
//! 3. **Pipeline events:** Data-hazard stalls, macro-expansion stalls,
//!    branch flushes.
//! 4. **Branch prediction:** Correct predictions and mispredictions.
//! 5. **Memory hierarchy:** Per-level cache hits/misses and accrued
//!    latency.

/// Per-cache-level counters mirrored out of the hierarchy after a run.
#[derive(Clone, Copy, Debug, Default)]
pub struct CacheLevelStats {
    /// Lookups satisfied by this level.
    pub hits: u64,
    /// Lookups that fell through to the next level.
    pub misses: u64,
}

/// Statistics for one simulation run.
#[derive(Clone, Debug, Default)]
pub struct SimStats {
    /// Steps taken by the run loop.
    pub cycles: u64,
    /// Writeback commands retired (micro-ops count individually).
    pub instructions_retired: u64,

    /// Retired register writes other than branches and side channels.
    pub inst_alu: u64,
    /// Retired memory stores.
    pub inst_store: u64,
    /// Retired PC writes.
    pub inst_branch: u64,
    /// Retired writes to the r29/r30 output side channels.
    pub inst_output: u64,

    /// Cycles lost to data-hazard squashes.
    pub stalls_data: u64,
    /// Bubble cycles injected by macro expansion back-pressure.
    pub stalls_macro: u64,
    /// Pipeline flushes from unpredicted branches.
    pub flushes: u64,

    /// Branch retirements whose next PC matched the fetched path.
    pub bp_correct: u64,
    /// Branch retirements that flushed and retrained the predictor.
    pub bp_mispredict: u64,

    /// Total read latency accrued by the cache hierarchy.
    pub mem_latency: u64,
    /// Per-level cache counters, nearest level first.
    pub cache_levels: Vec<CacheLevelStats>,
}

impl SimStats {
    /// Prints the full report to stdout.
    pub fn print(&self) {
        let cyc = self.cycles.max(1);
        let instr = self.instructions_retired.max(1);

        println!("==================================================");
        println!("BATBRIDGE SIMULATION STATISTICS");
        println!("==================================================");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts                {}", self.instructions_retired);
        println!("sim_cpi                  {:.4}", cyc as f64 / instr as f64);
        println!("--------------------------------------------------");
        println!("INSTRUCTION MIX");
        let mix = |name: &str, n: u64| {
            println!(
                "  op.{:<18} {} ({:.2}%)",
                name,
                n,
                (n as f64 / instr as f64) * 100.0
            );
        };
        mix("alu", self.inst_alu);
        mix("store", self.inst_store);
        mix("branch", self.inst_branch);
        mix("output", self.inst_output);
        println!("--------------------------------------------------");
        println!("PIPELINE");
        println!("  stalls.data            {}", self.stalls_data);
        println!("  stalls.macro           {}", self.stalls_macro);
        println!("  flushes                {}", self.flushes);
        let bp_total = self.bp_correct + self.bp_mispredict;
        if bp_total > 0 {
            println!("  bp.lookups             {}", bp_total);
            println!("  bp.mispredicts         {}", self.bp_mispredict);
            println!(
                "  bp.accuracy            {:.2}%",
                100.0 * self.bp_correct as f64 / bp_total as f64
            );
        }
        if !self.cache_levels.is_empty() {
            println!("--------------------------------------------------");
            println!("MEMORY HIERARCHY");
            for (i, level) in self.cache_levels.iter().enumerate() {
                let total = level.hits + level.misses;
                let miss_rate = if total > 0 {
                    100.0 * level.misses as f64 / total as f64
                } else {
                    0.0
                };
                println!(
                    "  L{}     accesses: {:<10} | hits: {:<10} | miss_rate: {:.2}%",
                    i + 1,
                    total,
                    level.hits,
                    miss_rate
                );
            }
            println!("  latency.accrued        {}", self.mem_latency);
        }
        println!("==================================================");
    }
}
