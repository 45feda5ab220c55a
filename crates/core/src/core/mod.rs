//! CPU core: machine state, opcode semantics, pipeline, and units.

/// Operand resolution and per-opcode semantics.
pub mod exec;
/// The processor state record.
pub mod machine;
/// Latches, stages, hazards, and step drivers.
pub mod pipeline;
/// Branch predictor and cache hierarchy.
pub mod units;

pub use self::machine::Machine;
