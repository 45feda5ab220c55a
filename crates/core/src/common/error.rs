//! Simulator fault definitions.
//!
//! This module defines the fatal execution faults a BatBridge machine can
//! raise. It provides:
//! 1. **Fault Representation:** One variant per fault class fixed by the ISA.
//! 2. **Error Handling:** Integration with the standard Rust error traits so
//!    faults propagate with `?` up to the run loop and the CLI.
//!
//! Faults are fatal: the run loop stops on the first one and leaves the
//! machine state intact for diagnosis. Recoverable events (data hazards,
//! branch mispredictions) are handled inside the pipeline and never appear
//! here. Reaching a cycle bound is reported through
//! [`RunOutcome`](crate::sim::simulator::RunOutcome), not as a fault.

use std::fmt;

/// Fatal execution faults raised by the execute and writeback stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// An opcode with no execute semantics reached the execute stage.
    ///
    /// Carries the 6-bit opcode value and the address of the offending
    /// instruction. Raised both for encodings outside the opcode table and
    /// for decoded-but-unimplemented extension opcodes.
    InvalidOpcode { code: u32, pc: u32 },

    /// `div` or `mod` with a zero divisor.
    ///
    /// Carries the address of the offending instruction.
    ArithmeticTrap { pc: u32 },

    /// A register index outside 0..31.
    ///
    /// Only reachable from a corrupted program image; word decoding can
    /// never produce one.
    InvalidRegister { index: usize },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidOpcode { code, pc } => {
                write!(f, "InvalidOpcode(code={:#04x}, pc={:#x})", code, pc)
            }
            SimError::ArithmeticTrap { pc } => write!(f, "ArithmeticTrap(pc={:#x})", pc),
            SimError::InvalidRegister { index } => write!(f, "InvalidRegister({})", index),
        }
    }
}

impl std::error::Error for SimError {}
