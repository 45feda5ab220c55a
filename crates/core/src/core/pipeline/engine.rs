//! Step drivers for the three execution models.
//!
//! A step is one clock edge. The single-cycle driver calls the stages in
//! program order, so one instruction flows from fetch to retirement within
//! a step. The pipelined drivers call the stages in *reverse* order, so
//! each stage consumes the latch its upstream neighbour filled on the
//! previous step; four instructions are in flight at once.
//!
//! The predicted model is the pipelined driver over a machine that carries
//! a branch predictor: fetch and writeback pick up the predictor through
//! the state record, so no third stage sequence exists.

use crate::common::error::SimError;
use crate::config::CoreVariant;
use crate::core::machine::Machine;
use crate::core::pipeline::stages::{
    FlushPolicy, decode_stage, decode_stage_hazard, execute_stage, fetch_stage, stall_dec,
    writeback_stage,
};

/// One step of the single-cycle model: fetch through writeback in program
/// order. Macro expansion still drains through the pending-ops queue, so a
/// `push` or `pop` retires one micro-op per step.
pub fn step_serial(m: &mut Machine) -> Result<(), SimError> {
    fetch_stage(m);
    decode_stage(m);
    execute_stage(m)?;
    writeback_stage(m, FlushPolicy::Retire)?;
    stall_dec(m);
    m.stats.cycles += 1;
    Ok(())
}

/// One step of the pipelined models: writeback through fetch in reverse
/// order, so the state record acts as the set of inter-stage latches.
///
/// When the writeback retires a halt, the younger stages are skipped for
/// the remainder of the step: instructions behind a halt must not execute,
/// and words past the end of a program rarely decode to anything
/// meaningful.
pub fn step_pipelined(m: &mut Machine) -> Result<(), SimError> {
    writeback_stage(m, FlushPolicy::FlushOnBranch)?;
    if !m.halted {
        execute_stage(m)?;
        decode_stage_hazard(m);
        fetch_stage(m);
    }
    stall_dec(m);
    m.stats.cycles += 1;
    Ok(())
}

/// Advances a machine one step under the given execution model.
pub fn step(m: &mut Machine, variant: CoreVariant) -> Result<(), SimError> {
    match variant {
        CoreVariant::SingleCycle => step_serial(m),
        CoreVariant::Pipelined | CoreVariant::Predicted => step_pipelined(m),
    }
}
