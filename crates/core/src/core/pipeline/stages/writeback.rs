//! Writeback stage.
//!
//! The only stage that mutates architectural state. Dispatches the latched
//! writeback command: halt, memory store, register write, the r29/r30
//! output side channels, or a branch. Branches are where the execution
//! models diverge: the pipelined driver flushes the front latches on every
//! PC write, while the predicted driver flushes only on a misprediction and
//! trains the predictor either way. The single-cycle driver never flushes,
//! so a macro's remaining micro-ops always survive their own branch.

use crate::common::error::SimError;
use crate::common::reg::{R_IMM, R_PC, R_ZERO, REG_COUNT};
use crate::core::machine::Machine;
use crate::core::pipeline::latches::{Dst, WbCmd};
use crate::mem::normalize;

/// Branch handling policy for the writeback stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Retire in place; never flush (single-cycle).
    Retire,
    /// Flush the front latches on every PC write (pipelined); the predicted
    /// variant narrows this to mispredictions via the machine's predictor.
    FlushOnBranch,
}

/// Executes the writeback stage.
pub fn writeback_stage(m: &mut Machine, policy: FlushPolicy) -> Result<(), SimError> {
    let Some(cmd) = m.latches.execute.take() else {
        return Ok(());
    };

    if m.trace {
        eprintln!(
            "WB  pc={:#x} {:?} addr={:#x} val={}",
            cmd.pc, cmd.dst, cmd.addr, cmd.val
        );
    }

    m.stats.instructions_retired += 1;
    match cmd.dst {
        Dst::Halt => {
            m.halted = true;
        }
        Dst::Memory => {
            m.stats.inst_store += 1;
            m.mem.write(cmd.addr, cmd.val);
        }
        Dst::Registers => match cmd.addr as usize {
            R_ZERO => {
                m.stats.inst_output += 1;
                if cmd.val != 0 {
                    m.sink.write_char(cmd.val as u8);
                }
            }
            R_IMM => {
                m.stats.inst_output += 1;
                if cmd.val != 0 {
                    m.sink.write_hex(cmd.val);
                }
            }
            R_PC => {
                m.stats.inst_branch += 1;
                retire_branch(m, &cmd, policy);
            }
            r if r < REG_COUNT => {
                m.stats.inst_alu += 1;
                m.regs.write(r, cmd.val);
            }
            r => return Err(SimError::InvalidRegister { index: r }),
        },
    }
    Ok(())
}

/// Retires a PC write: redirect, flush per policy, train the predictor.
fn retire_branch(m: &mut Machine, cmd: &WbCmd, policy: FlushPolicy) {
    let target = normalize(cmd.val as u32);
    let sequential = cmd.pc.wrapping_add(4);

    if m.predictor.is_some() {
        if target == cmd.npc {
            m.stats.bp_correct += 1;
        } else {
            m.stats.bp_mispredict += 1;
            flush_front(m, cmd.pc);
        }
        // Train on the actual outcome: "taken" means control left the
        // sequential path, whatever the fetch-side guess was.
        if let Some(predictor) = &mut m.predictor {
            predictor.train(cmd.pc, target != sequential, target);
        }
    } else if policy == FlushPolicy::FlushOnBranch {
        m.stats.flushes += 1;
        flush_front(m, cmd.pc);
    } else if m.latches.fetch.is_some() {
        // Serial driver: a fetch entry latched across a branching macro
        // micro-op sits on the fall-through path and must not decode.
        m.latches.fetch = None;
    }

    if m.trace {
        eprintln!("WB  pc={:#x} * branch -> {:#x}", cmd.pc, target);
    }
    m.regs.set_pc(target);
}

/// Clears the fetch and decode latches of wrong-path work.
///
/// The retiring instruction's own remaining micro-ops are not wrong-path:
/// a macro that branches (a pop into the PC) still owes its stack-pointer
/// update, so latched work carrying the retiring `pc` survives the flush.
fn flush_front(m: &mut Machine, retiring_pc: u32) {
    m.latches.fetch = None;
    if m.latches.decode.as_ref().is_some_and(|d| d.pc != retiring_pc) {
        m.latches.decode = None;
    }
    if m
        .latches
        .decode_ops
        .front()
        .is_some_and(|op| op.pc != retiring_pc)
    {
        m.latches.decode_ops.clear();
    }
}
