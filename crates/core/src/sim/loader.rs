//! Program image loader.
//!
//! This module realizes the external-assembler interface. It performs:
//! 1. **Image building:** A [`Program`] maps 4-aligned addresses to
//!    instruction words; symbolic instructions are assembled through the
//!    codec at insertion, so memory holds one representation.
//! 2. **Text parsing:** One instruction per line in assembler syntax, raw
//!    words, `@addr` origin directives, and `;`/`#` comments.
//! 3. **File loading:** Reading a program file from disk.
//!
//! Accepted line forms:
//!
//! ```text
//! ; fib counter
//! @0x100
//! add r0, r30, r_IMM, 14
//! ifeq r0 r30 0
//! hlt
//! 0xC3DEF000
//! .word 0x7C000000
//! ```
//!
//! Registers are written `rN`, a bare index, or one of the aliases
//! `r_PC`/`r_ZERO`/`r_IMM` (case-insensitive). Commas are optional.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::isa::instruction::{AsmInst, RegRef};
use crate::isa::opcode::OpCode;
use crate::mem::{Memory, normalize};

/// Smallest value representable in the signed 11-bit immediate field.
const IMM_MIN: i32 = -1024;
/// Largest value representable in the signed 11-bit immediate field.
const IMM_MAX: i32 = 1023;

/// Errors raised while loading a program image.
#[derive(Debug)]
pub enum LoadError {
    /// The program file could not be read.
    Io(io::Error),
    /// A source line failed to parse; carries the 1-based line number.
    Parse { line: usize, message: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "io error: {}", e),
            LoadError::Parse { line, message } => write!(f, "line {}: {}", line, message),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}

/// A program image: a mapping from 4-aligned addresses to instruction
/// words. Addresses outside the mapping read as zero once installed.
#[derive(Clone, Debug, Default)]
pub struct Program {
    words: BTreeMap<u32, u32>,
    cursor: u32,
}

impl Program {
    /// An empty image with the cursor at address 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an image from a symbolic instruction sequence placed at 0.
    pub fn from_asm(insts: &[AsmInst]) -> Self {
        let mut program = Self::new();
        for inst in insts {
            program.push_asm(*inst);
        }
        program
    }

    /// Appends a symbolic instruction at the cursor, assembling it.
    pub fn push_asm(&mut self, inst: AsmInst) {
        self.push_word(inst.encode());
    }

    /// Appends a raw word at the cursor.
    pub fn push_word(&mut self, word: u32) {
        self.words.insert(self.cursor, word);
        self.cursor = self.cursor.wrapping_add(4);
    }

    /// Places a raw word at an explicit (normalized) address.
    pub fn set_word(&mut self, addr: u32, word: u32) {
        self.words.insert(normalize(addr), word);
    }

    /// Moves the cursor for subsequent appends.
    pub fn set_origin(&mut self, addr: u32) {
        self.cursor = normalize(addr);
    }

    /// The assembled image.
    pub fn words(&self) -> &BTreeMap<u32, u32> {
        &self.words
    }

    /// Installs the image into a machine memory.
    pub fn install(&self, mem: &mut Memory) {
        for (&addr, &word) in &self.words {
            mem.load_word(addr, word);
        }
    }
}

/// Parses a textual program image.
pub fn parse_program(src: &str) -> Result<Program, LoadError> {
    let mut program = Program::new();
    for (idx, raw_line) in src.lines().enumerate() {
        let line = idx + 1;
        let text = strip_comment(raw_line).trim();
        if text.is_empty() {
            continue;
        }
        parse_line(text, &mut program).map_err(|message| LoadError::Parse { line, message })?;
    }
    Ok(program)
}

/// Reads and parses a program file.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Program, LoadError> {
    let src = fs::read_to_string(path)?;
    parse_program(&src)
}

fn strip_comment(line: &str) -> &str {
    match line.find([';', '#']) {
        Some(at) => &line[..at],
        None => line,
    }
}

fn parse_line(text: &str, program: &mut Program) -> Result<(), String> {
    if let Some(rest) = text.strip_prefix('@') {
        let addr = parse_int(rest.trim())? as u32;
        program.set_origin(addr);
        return Ok(());
    }

    let cleaned = text.replace(',', " ");
    let mut tokens = cleaned.split_whitespace();
    let Some(head) = tokens.next() else {
        return Ok(());
    };
    let operands: Vec<&str> = tokens.collect();

    if head == ".word" {
        let &[word] = operands.as_slice() else {
            return Err(".word takes exactly one operand".to_string());
        };
        program.push_word(parse_int(word)? as u32);
        return Ok(());
    }

    if let Some(op) = OpCode::from_mnemonic(&head.to_ascii_lowercase()) {
        program.push_asm(parse_inst(op, &operands)?);
        return Ok(());
    }

    // A bare literal is a raw data or instruction word.
    if operands.is_empty() {
        program.push_word(parse_int(head)? as u32);
        return Ok(());
    }

    Err(format!("unknown mnemonic '{}'", head))
}

fn parse_inst(op: OpCode, operands: &[&str]) -> Result<AsmInst, String> {
    match op {
        OpCode::Hlt => {
            if !operands.is_empty() {
                return Err("hlt takes no operands".to_string());
            }
            Ok(AsmInst::hlt())
        }
        op if op.is_conditional() => {
            let &[a, b, i] = operands else {
                return Err(format!("{} takes 3 operands (a, b, i)", op.mnemonic()));
            };
            Ok(AsmInst::cond(op, parse_reg(a)?, parse_reg(b)?, parse_imm(i)?))
        }
        op => {
            let &[d, a, b, i] = operands else {
                return Err(format!("{} takes 4 operands (d, a, b, i)", op.mnemonic()));
            };
            Ok(AsmInst::new(
                op,
                parse_reg(d)?,
                parse_reg(a)?,
                parse_reg(b)?,
                parse_imm(i)?,
            ))
        }
    }
}

fn parse_reg(token: &str) -> Result<RegRef, String> {
    let lower = token.to_ascii_lowercase();
    match lower.as_str() {
        "r_pc" | "pc" => return Ok(RegRef::Pc),
        "r_zero" | "zero" => return Ok(RegRef::Zero),
        "r_imm" | "imm" => return Ok(RegRef::Imm),
        _ => {}
    }
    let digits = lower.strip_prefix('r').unwrap_or(&lower);
    let idx: u8 = digits
        .parse()
        .map_err(|_| format!("bad register '{}'", token))?;
    if idx > 31 {
        return Err(format!("register index {} out of range", idx));
    }
    Ok(RegRef::Idx(idx))
}

fn parse_imm(token: &str) -> Result<i32, String> {
    let val = parse_int(token)?;
    if !(IMM_MIN..=IMM_MAX).contains(&val) {
        return Err(format!("immediate {} outside signed 11-bit range", val));
    }
    Ok(val)
}

fn parse_int(token: &str) -> Result<i32, String> {
    let (neg, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|_| format!("bad number '{}'", token))?
    } else {
        body.parse::<u32>()
            .map_err(|_| format!("bad number '{}'", token))?
    };
    let val = magnitude as i32;
    Ok(if neg { val.wrapping_neg() } else { val })
}
