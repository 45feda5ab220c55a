//! Register file and architectural register names.
//!
//! This module provides the `RegisterFile` struct holding the 32
//! general-purpose BatBridge registers, plus the three architecturally
//! special indices:
//! 1. **`R_PC` (31):** Holds the next fetch address; writing it is a branch.
//! 2. **`R_ZERO` (30):** Reads as zero; retired writes feed the character
//!    output side channel.
//! 3. **`R_IMM` (29):** Reads as the executing instruction's immediate;
//!    retired writes feed the hex output side channel.
//!
//! The special read behavior of 29/30/31 lives in the operand resolver,
//! which knows the executing instruction's `pc` and immediate. The register
//! file itself is plain storage; the writeback stage is its only writer.

/// Number of architectural registers.
pub const REG_COUNT: usize = 32;

/// Program counter register index (`r_PC`).
pub const R_PC: usize = 31;

/// Zero register index (`r_ZERO`); the character output side channel.
pub const R_ZERO: usize = 30;

/// Immediate register index (`r_IMM`); the hex output side channel.
pub const R_IMM: usize = 29;

/// The 32-entry signed 32-bit register file.
///
/// All registers start at zero, including the program counter.
#[derive(Clone)]
pub struct RegisterFile {
    regs: [i32; REG_COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Creates a register file with every register zeroed.
    pub fn new() -> Self {
        Self {
            regs: [0; REG_COUNT],
        }
    }

    /// Reads the raw stored value of a register.
    ///
    /// This is the storage view: it does not apply the special read
    /// semantics of `r_PC`/`r_ZERO`/`r_IMM` (see the operand resolver).
    #[inline]
    pub fn read(&self, idx: usize) -> i32 {
        debug_assert!(idx < REG_COUNT);
        self.regs[idx]
    }

    /// Writes a register.
    #[inline]
    pub fn write(&mut self, idx: usize, val: i32) {
        debug_assert!(idx < REG_COUNT);
        self.regs[idx] = val;
    }

    /// The next fetch address, as an unsigned word address.
    #[inline]
    pub fn pc(&self) -> u32 {
        self.regs[R_PC] as u32
    }

    /// Redirects the next fetch address.
    #[inline]
    pub fn set_pc(&mut self, pc: u32) {
        self.regs[R_PC] = pc as i32;
    }

    /// Dumps the register contents to stderr, four per line.
    ///
    /// Useful when a fatal fault stops the run loop.
    pub fn dump(&self) {
        for row in 0..(REG_COUNT / 4) {
            let i = row * 4;
            eprintln!(
                "r{:<2} {:>11}  r{:<2} {:>11}  r{:<2} {:>11}  r{:<2} {:>11}",
                i,
                self.regs[i],
                i + 1,
                self.regs[i + 1],
                i + 2,
                self.regs[i + 2],
                i + 3,
                self.regs[i + 3],
            );
        }
    }
}
