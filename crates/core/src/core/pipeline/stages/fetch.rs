//! Instruction fetch stage.
//!
//! Reads the word at the current PC, latches it with its addresses, and
//! advances the PC. On the predicted variant the branch predictor is
//! consulted after the fetch and may redirect both the latched `npc` and
//! the PC register.

use crate::core::machine::Machine;
use crate::core::pipeline::latches::FetchEntry;

/// Executes the fetch stage.
///
/// - A halted machine latches the canonical no-op and changes nothing else,
///   so a draining pipeline sees bubbles.
/// - A stalled fetch, or one whose latch is still occupied, does nothing:
///   the PC advances exactly once per consumed fetch.
pub fn fetch_stage(m: &mut Machine) {
    if m.halted {
        let pc = m.regs.pc();
        m.latches.fetch = Some(FetchEntry {
            word: crate::isa::codec::NOP_WORD,
            pc,
            npc: pc.wrapping_add(4),
        });
        return;
    }

    if m.stall > 0 || m.latches.fetch.is_some() {
        if m.trace && m.stall > 0 {
            eprintln!("IF  pc={:#x} * stalled ({})", m.regs.pc(), m.stall);
        }
        return;
    }

    let pc = m.regs.pc();
    let word = m.mem.read(pc) as u32;
    let mut npc = pc.wrapping_add(4);

    if m.trace {
        eprintln!("IF  pc={:#x} word={:#010x}", pc, word);
    }

    if let Some(predictor) = &m.predictor {
        if let Some(target) = predictor.predict(pc) {
            if m.trace {
                eprintln!("IF  pc={:#x} * predicted taken -> {:#x}", pc, target);
            }
            npc = target;
        }
    }

    m.latches.fetch = Some(FetchEntry { word, pc, npc });
    m.regs.set_pc(npc);
}
