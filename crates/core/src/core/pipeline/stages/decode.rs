//! Instruction decode stage.
//!
//! Decodes the latched fetch result, expands macro opcodes into the
//! pending-ops queue, and (for the pipelined drivers) runs data-hazard
//! detection against the in-flight execute result.

use crate::core::machine::Machine;
use crate::core::pipeline::hazards;
use crate::isa::decode::{decode_word, expand_macro};
use crate::isa::disasm::disasm;

/// Where this cycle's decode result came from.
///
/// Hazard detection only applies to freshly fetched instructions: a
/// micro-op drained from the queue cannot be replayed by refetching, and
/// the reverse stage order guarantees its producer retires before it
/// executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeSource {
    /// No input; the decode latch holds a bubble.
    Bubble,
    /// Decoded from the fetch latch.
    Fetched,
    /// Drained from the macro pending-ops queue.
    MacroQueue,
}

/// Executes the decode stage without hazard detection (single-cycle).
///
/// A non-empty pending-ops queue takes priority over the fetch latch, so a
/// macro's micro-ops drain one per cycle while the fetched stream waits.
/// Decoding a macro latches its first micro-op, queues the rest, and raises
/// the fetch stall by `expansion - 1` to back-pressure the front end.
pub fn decode_stage(m: &mut Machine) -> DecodeSource {
    if let Some(op) = m.latches.decode_ops.pop_front() {
        if m.trace {
            eprintln!("ID  pc={:#x} {} (macro op)", op.pc, disasm(&op));
        }
        m.latches.decode = Some(op);
        return DecodeSource::MacroQueue;
    }

    let Some(entry) = m.latches.fetch.take() else {
        m.latches.decode = None;
        return DecodeSource::Bubble;
    };

    let inst = decode_word(entry.word, entry.pc, entry.npc);

    if let Some(expansion) = expand_macro(&inst) {
        let [first, rest @ ..] = expansion;
        m.stall += rest.len() as u32;
        m.stats.stalls_macro += rest.len() as u64;
        m.latches.decode_ops.extend(rest);
        if m.trace {
            eprintln!(
                "ID  pc={:#x} {} -> {} (expanded)",
                inst.pc,
                disasm(&inst),
                disasm(&first)
            );
        }
        m.latches.decode = Some(first);
        return DecodeSource::Fetched;
    }

    if m.trace {
        eprintln!("ID  pc={:#x} {}", inst.pc, disasm(&inst));
    }
    m.latches.decode = Some(inst);
    DecodeSource::Fetched
}

/// Executes the decode stage with hazard detection (pipelined drivers).
///
/// When the freshly decoded instruction reads a register the in-flight
/// execute result is about to write, this cycle's decode is squashed: both
/// front latches drop, the stall counter rises, and the PC rewinds to the
/// squashed address so fetch replays it after the producer retires. A
/// squashed macro also drops its just-queued micro-ops, since the refetch
/// will expand it again.
pub fn decode_stage_hazard(m: &mut Machine) {
    let source = decode_stage(m);
    if source != DecodeSource::Fetched {
        return;
    }

    let Some(dec) = &m.latches.decode else {
        return;
    };
    if hazards::raw_hazard(m.latches.execute.as_ref(), dec) {
        let pc = dec.pc;
        if m.trace {
            eprintln!("ID  pc={:#x} * data hazard, squashing", pc);
        }
        m.latches.decode = None;
        m.latches.fetch = None;
        m.latches.decode_ops.clear();
        m.stall += 1;
        m.stats.stalls_data += 1;
        m.regs.set_pc(pc);
    }
}
