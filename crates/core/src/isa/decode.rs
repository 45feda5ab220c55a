//! Instruction decoder and macro expansion.
//!
//! The single decode entry point shared by every execution model. It
//! performs:
//! 1. **Word decode:** Codec projections plus opcode-symbol lookup; codes
//!    outside the table pass through as [`Icode::Unknown`].
//! 2. **Symbolic decode:** Slot mapping for the vector form, including the
//!    reduced conditional and halt layouts, with register aliases resolved
//!    to indices.
//! 3. **Macro expansion:** The canonical two-micro-op expansions for
//!    `push` and `pop`, consumed one per cycle through the decode
//!    pending-ops queue.

use crate::common::reg::{R_IMM, R_ZERO};
use crate::isa::codec::WordBits;
use crate::isa::instruction::{AsmInst, Blob, Icode, Inst};
use crate::isa::opcode::OpCode;

/// Decodes an instruction word fetched from memory.
pub fn decode_word(word: u32, pc: u32, npc: u32) -> Inst {
    let code = word.opcode();
    let op = match OpCode::from_code(code) {
        Some(op) => Icode::Known(op),
        None => Icode::Unknown(code),
    };
    Inst {
        op,
        d: word.d(),
        a: word.a(),
        b: word.b(),
        i: word.imm(),
        pc,
        npc,
    }
}

/// Decodes a symbolic instruction.
///
/// Conditionals map their three meaningful slots as `(a, b, i)` with
/// `d = 0`; `hlt` maps everything to zero; all other opcodes map the full
/// `(d, a, b, i)` tuple. Aliases resolve to 31/30/29.
pub fn decode_asm(inst: &AsmInst, pc: u32, npc: u32) -> Inst {
    let (d, a, b, i) = match inst.op {
        OpCode::Hlt => (0, 0, 0, 0),
        op if op.is_conditional() => (0, inst.a.index(), inst.b.index(), inst.i),
        _ => (
            inst.d.index(),
            inst.a.index(),
            inst.b.index(),
            inst.i,
        ),
    };
    Inst {
        op: Icode::Known(inst.op),
        d,
        a,
        b,
        i,
        pc,
        npc,
    }
}

/// Decodes either instruction form.
pub fn decode(blob: &Blob, pc: u32, npc: u32) -> Inst {
    match blob {
        Blob::Word(w) => decode_word(*w, pc, npc),
        Blob::Asm(v) => decode_asm(v, pc, npc),
    }
}

/// Expands a macro opcode into its micro-op sequence.
///
/// Returns `None` for non-macro instructions. The stack pointer is the
/// macro's `a` operand; the immediate-alias register supplies the literal 4
/// so the micro-ops stay within the ordinary ALU and memory semantics:
///
/// - `push d, a`: `sub a, a, r_IMM, 4` then `st d, a, r_ZERO, 0`
///   (decrement, then store at the new top).
/// - `pop d, a`: `ld d, a, r_ZERO, 0` then `add a, a, r_IMM, 4`
///   (load the top, then increment).
///
/// Both micro-ops inherit the macro's `pc`/`npc` so operand resolution and
/// branch bookkeeping see the macro's own addresses.
pub fn expand_macro(inst: &Inst) -> Option<[Inst; 2]> {
    let make = |op: OpCode, d: usize, a: usize, b: usize, i: i32| Inst {
        op: Icode::Known(op),
        d,
        a,
        b,
        i,
        pc: inst.pc,
        npc: inst.npc,
    };
    match inst.op {
        Icode::Known(OpCode::Push) => Some([
            make(OpCode::Sub, inst.a, inst.a, R_IMM, 4),
            make(OpCode::St, inst.d, inst.a, R_ZERO, 0),
        ]),
        Icode::Known(OpCode::Pop) => Some([
            make(OpCode::Ld, inst.d, inst.a, R_ZERO, 0),
            make(OpCode::Add, inst.a, inst.a, R_IMM, 4),
        ]),
        _ => None,
    }
}
