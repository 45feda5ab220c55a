//! One-line instruction rendering for trace output.
//!
//! The output uses the loader's own syntax, so a disassembled line parses
//! back to the instruction it came from.

use crate::isa::instruction::{Icode, Inst};
use crate::isa::opcode::OpCode;

/// Renders a decoded instruction in assembler syntax.
pub fn disasm(inst: &Inst) -> String {
    match inst.op {
        Icode::Unknown(code) => format!(".word {:#010x}", rebuild_word(inst, code)),
        Icode::Known(OpCode::Hlt) => "hlt".to_string(),
        Icode::Known(op) if op.is_conditional() => {
            format!("{} r{}, r{}, {}", op.mnemonic(), inst.a, inst.b, inst.i)
        }
        Icode::Known(op) => format!(
            "{} r{}, r{}, r{}, {}",
            op.mnemonic(),
            inst.d,
            inst.a,
            inst.b,
            inst.i
        ),
    }
}

fn rebuild_word(inst: &Inst, code: u32) -> u32 {
    crate::isa::codec::pack(code, inst.d, inst.a, inst.b, inst.i)
}
