//! The four pipeline stage functions plus the stall decrement.
//!
//! Every execution model runs these same functions; the drivers in
//! [`engine`](crate::core::pipeline::engine) differ only in call order and
//! flush policy.

/// Decode stage, with and without hazard detection.
pub mod decode;
/// Execute stage.
pub mod execute;
/// Fetch stage.
pub mod fetch;
/// Writeback stage.
pub mod writeback;

pub use self::decode::{decode_stage, decode_stage_hazard};
pub use self::execute::execute_stage;
pub use self::fetch::fetch_stage;
pub use self::writeback::{FlushPolicy, writeback_stage};

use crate::core::machine::Machine;

/// End-of-step stall decrement, saturating at zero.
pub fn stall_dec(m: &mut Machine) {
    m.stall = m.stall.saturating_sub(1);
}
