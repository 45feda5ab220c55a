//! BatBridge cycle-accurate simulator library.
//!
//! This crate implements the BatBridge BB32 word-addressed RISC
//! architecture (v0 plus the v1 stack extension opcodes) with the
//! following:
//! 1. **ISA:** Word codec, opcode table, decoder, and per-opcode semantics
//!    shared by every execution model.
//! 2. **Core:** Machine state record, pipeline latches, stage functions,
//!    hazard stalling, and branch flush.
//! 3. **Models:** Single-cycle, pipelined, and GShare-predicted step
//!    drivers producing identical architectural results.
//! 4. **Memory:** Sparse word store with an optional multi-level LFU cache
//!    hierarchy (latency modelling only).
//! 5. **Simulation:** Program loader, configuration, run loop, and
//!    statistics collection.

/// Common types (faults, register file, architectural register names).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical structures).
pub mod config;
/// CPU core (machine state, semantics, pipeline, units).
pub mod core;
/// Output side channel sinks.
pub mod devices;
/// Instruction set model (codec, opcodes, decode, disassembly).
pub mod isa;
/// Word-addressed memory.
pub mod mem;
/// Program loading and the run loop.
pub mod sim;
/// Statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Execution model selector.
pub use crate::config::CoreVariant;
/// Fatal fault type returned by stepping.
pub use crate::common::SimError;
/// The processor state record.
pub use crate::core::Machine;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
/// Outcome of a bounded run.
pub use crate::sim::RunOutcome;
