//! Data hazard detection.
//!
//! The pipelined models have no forwarding paths: when an instruction in
//! decode reads a register the in-flight execute result is about to write,
//! the decode is squashed and replayed after the producer retires. The
//! check is one latch deep; by the time a consumer is two slots behind its
//! producer, the producer has already retired.

use crate::common::reg::{R_IMM, R_ZERO};
use crate::core::pipeline::latches::{Dst, WbCmd};
use crate::isa::instruction::Inst;

/// Checks for a read-after-write hazard between the in-flight execute
/// result and a freshly decoded instruction.
///
/// Only the `a` and `b` source slots participate: the zero and immediate
/// registers resolve to instruction-local values and never stall, and a
/// store's `d` source is refreshed by the producer's writeback before the
/// store executes.
pub fn raw_hazard(exec: Option<&WbCmd>, dec: &Inst) -> bool {
    let Some(cmd) = exec else {
        return false;
    };
    if cmd.dst != Dst::Registers {
        return false;
    }
    let dst = cmd.addr as usize;
    [dec.a, dec.b]
        .into_iter()
        .filter(|&r| r != R_ZERO && r != R_IMM)
        .any(|r| r == dst)
}
