//! Execute stage.
//!
//! Resolves operands, dispatches to the opcode semantics, and latches the
//! resulting writeback command. Unknown opcodes and arithmetic traps
//! surface here as fatal faults.

use crate::common::error::SimError;
use crate::core::exec::execute_inst;
use crate::core::machine::Machine;

/// Executes the execute stage.
pub fn execute_stage(m: &mut Machine) -> Result<(), SimError> {
    let Some(inst) = m.latches.decode.take() else {
        m.latches.execute = None;
        return Ok(());
    };

    let cmd = execute_inst(m, &inst)?;
    if m.trace {
        eprintln!(
            "EX  pc={:#x} {:?} addr={:#x} val={}",
            cmd.pc, cmd.dst, cmd.addr, cmd.val
        );
    }
    m.latches.execute = Some(cmd);
    Ok(())
}
