//! Operand resolution and per-opcode semantics.
//!
//! This module is the heart of the instruction-set model. It provides:
//! 1. **Operand resolver:** Register reads with the architectural special
//!    cases for `r_PC`, `r_ZERO`, and `r_IMM`, which name instruction-local
//!    values rather than storage.
//! 2. **Opcode semantics:** A pure function per opcode from resolved
//!    operands to a writeback command.
//!
//! The resolver must know the executing instruction's next-PC and
//! immediate: `r_PC` reads as the next instruction address and `r_IMM` as
//! the instruction's own literal. That single contract is why every
//! semantic function takes the decoded instruction rather than bare values.

use crate::common::error::SimError;
use crate::common::reg::{R_IMM, R_PC, R_ZERO, REG_COUNT};
use crate::core::machine::Machine;
use crate::core::pipeline::latches::{Dst, WbCmd};
use crate::isa::instruction::{Icode, Inst};
use crate::isa::opcode::OpCode;
use crate::mem::normalize;

/// Resolves a register read for an instruction at `pc` with immediate `i`.
///
/// - index 31 reads the next instruction address (`pc + 4`),
/// - index 30 reads zero,
/// - index 29 reads the sign-extended immediate,
/// - anything else reads the register file.
///
/// The PC read is always the sequential successor, never the (possibly
/// predicted) fetch path: what an instruction observes in `r_PC` is an
/// architectural value and cannot depend on the predictor.
pub fn read_operand(m: &Machine, idx: usize, next_pc: u32, i: i32) -> Result<i32, SimError> {
    match idx {
        R_PC => Ok(next_pc as i32),
        R_ZERO => Ok(0),
        R_IMM => Ok(i),
        idx if idx < REG_COUNT => Ok(m.regs.read(idx)),
        idx => Err(SimError::InvalidRegister { index: idx }),
    }
}

/// Executes one decoded instruction, producing its writeback command.
///
/// `x` and `y` are the resolved `a` and `b` operands. Store semantics also
/// resolve `d` as a source. Macro opcodes and the decoded-only v1 opcodes
/// have no semantics here; one reaching this point is a fault.
pub fn execute_inst(m: &mut Machine, inst: &Inst) -> Result<WbCmd, SimError> {
    let op = match inst.op {
        Icode::Known(op) => op,
        Icode::Unknown(code) => {
            return Err(SimError::InvalidOpcode {
                code,
                pc: inst.pc,
            });
        }
    };

    let seq = inst.pc.wrapping_add(4);
    let x = read_operand(m, inst.a, seq, inst.i)?;
    let y = read_operand(m, inst.b, seq, inst.i)?;

    let reg_write = |val: i32| WbCmd {
        dst: Dst::Registers,
        addr: inst.d as u32,
        val,
        pc: inst.pc,
        npc: inst.npc,
    };
    let branch = |val: u32| WbCmd {
        dst: Dst::Registers,
        addr: R_PC as u32,
        val: val as i32,
        pc: inst.pc,
        npc: inst.npc,
    };

    let cmd = match op {
        OpCode::Hlt => WbCmd {
            dst: Dst::Halt,
            addr: 0,
            val: 0,
            pc: inst.pc,
            npc: inst.npc,
        },

        OpCode::Ld => {
            let addr = mem_addr(x, y);
            let val = m.mem.read(addr);
            reg_write(val)
        }

        OpCode::St => WbCmd {
            dst: Dst::Memory,
            addr: mem_addr(x, y),
            val: read_operand(m, inst.d, seq, inst.i)?,
            pc: inst.pc,
            npc: inst.npc,
        },

        OpCode::IfLt => branch(cond_target(x < y, seq)),
        OpCode::IfLe => branch(cond_target(x <= y, seq)),
        OpCode::IfEq => branch(cond_target(x == y, seq)),
        OpCode::IfNe => branch(cond_target(x != y, seq)),

        OpCode::Add => reg_write(x.wrapping_add(y)),
        OpCode::Sub => reg_write(x.wrapping_sub(y)),
        OpCode::Mul => reg_write(x.wrapping_mul(y)),
        OpCode::Div => {
            if y == 0 {
                return Err(SimError::ArithmeticTrap { pc: inst.pc });
            }
            reg_write(x.wrapping_div(y))
        }
        OpCode::Mod => {
            if y == 0 {
                return Err(SimError::ArithmeticTrap { pc: inst.pc });
            }
            reg_write(x.wrapping_rem(y))
        }

        OpCode::And => reg_write(x & y),
        OpCode::Or => reg_write(x | y),
        OpCode::Nand => reg_write(!(x & y)),
        OpCode::Xor => reg_write(x ^ y),

        OpCode::Sl | OpCode::Sal => reg_write(((x as u32) << shamt(y)) as i32),
        OpCode::Sr => reg_write(((x as u32) >> shamt(y)) as i32),
        OpCode::Sar => reg_write(x >> shamt(y)),

        OpCode::Push
        | OpCode::Pop
        | OpCode::PushAll
        | OpCode::PopAll
        | OpCode::Call
        | OpCode::Intr => {
            return Err(SimError::InvalidOpcode {
                code: op.code(),
                pc: inst.pc,
            });
        }
    };
    Ok(cmd)
}

/// Effective address for `ld`/`st`: `x + 4*y`, normalized.
#[inline]
fn mem_addr(x: i32, y: i32) -> u32 {
    normalize(x.wrapping_add(y.wrapping_mul(4)) as u32)
}

/// Conditionals select the next instruction or skip over it.
#[inline]
fn cond_target(cond: bool, next_pc: u32) -> u32 {
    if cond { next_pc } else { next_pc.wrapping_add(4) }
}

/// Shift amounts use the low five bits of the operand.
#[inline]
fn shamt(y: i32) -> u32 {
    (y as u32) & 0x1F
}
