//! Instruction set model.
//!
//! Everything the execution models need to know about BatBridge
//! instructions: the word codec, the opcode table, the three instruction
//! representations, the decoder with macro expansion, and the
//! disassembler used by trace output.

/// Bit-level pack/unpack of instruction words.
pub mod codec;
/// Decoder and push/pop macro expansion.
pub mod decode;
/// Trace-oriented disassembly.
pub mod disasm;
/// Instruction representations (word, symbolic, decoded).
pub mod instruction;
/// The opcode table.
pub mod opcode;

pub use self::instruction::{AsmInst, Blob, Icode, Inst, RegRef};
pub use self::opcode::OpCode;
