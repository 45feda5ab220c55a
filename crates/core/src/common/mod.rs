//! Common types shared by every layer of the simulator.

/// Fatal simulator fault definitions.
pub mod error;
/// Register file and architectural register indices.
pub mod reg;

pub use self::error::SimError;
pub use self::reg::{R_IMM, R_PC, R_ZERO, REG_COUNT, RegisterFile};
