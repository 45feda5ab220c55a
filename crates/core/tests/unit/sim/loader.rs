//! Program loader tests.
//!
//! Text parsing (assembler lines, raw words, directives, comments), error
//! reporting, and file loading through a temporary directory.

use std::io::Write;

use batbridge_core::isa::codec::WordBits;
use batbridge_core::isa::instruction::{AsmInst, RegRef};
use batbridge_core::isa::opcode::OpCode;
use batbridge_core::sim::loader::{self, LoadError};

// ══════════════════════════════════════════════════════════
// 1. Line forms
// ══════════════════════════════════════════════════════════

/// Assembler lines assemble to sequential words from address 0.
#[test]
fn parses_assembler_lines() {
    let program = loader::parse_program(
        "add r0, r30, r29, 14\n\
         ifeq r0 r30 0\n\
         hlt\n",
    )
    .unwrap();

    let words = program.words();
    assert_eq!(words.len(), 3);
    assert_eq!(
        words[&0],
        AsmInst::new(OpCode::Add, RegRef::Idx(0), RegRef::Idx(30), RegRef::Idx(29), 14).encode()
    );
    assert_eq!(
        words[&4],
        AsmInst::cond(OpCode::IfEq, RegRef::Idx(0), RegRef::Idx(30), 0).encode()
    );
    assert_eq!(words[&8], AsmInst::hlt().encode());
}

/// Register aliases parse case-insensitively.
#[test]
fn parses_aliases() {
    let program = loader::parse_program("add r_PC, r_zero, R_IMM, 8\n").unwrap();
    let word = program.words()[&0];
    assert_eq!(word.d(), 31);
    assert_eq!(word.a(), 30);
    assert_eq!(word.b(), 29);
}

/// Raw hex and decimal words pass straight through.
#[test]
fn parses_raw_words() {
    let program = loader::parse_program("0xC3DEF000\n.word 0x7C000000\n42\n").unwrap();
    assert_eq!(program.words()[&0], 0xC3DE_F000);
    assert_eq!(program.words()[&4], 0x7C00_0000);
    assert_eq!(program.words()[&8], 42);
}

/// Origin directives move the cursor; comments and blanks are ignored.
#[test]
fn origin_and_comments() {
    let program = loader::parse_program(
        "; leading comment\n\
         hlt\n\
         @0x100\n\
         add r1, r30, r29, 1  ; trailing comment\n\
         # another comment style\n\
         \n\
         hlt\n",
    )
    .unwrap();
    let addrs: Vec<u32> = program.words().keys().copied().collect();
    assert_eq!(addrs, vec![0, 0x100, 0x104]);
}

/// Negative immediates parse down to the 11-bit floor.
#[test]
fn parses_negative_immediates() {
    let program = loader::parse_program("sub r31, r31, r29, -1024\n").unwrap();
    assert_eq!(program.words()[&0].imm(), -1024);
}

// ══════════════════════════════════════════════════════════
// 2. Errors
// ══════════════════════════════════════════════════════════

/// Parse errors carry the offending line number.
#[test]
fn reports_line_numbers() {
    let err = loader::parse_program("hlt\nfrobnicate r1\n").unwrap_err();
    match err {
        LoadError::Parse { line, message } => {
            assert_eq!(line, 2);
            assert!(message.contains("frobnicate"), "{}", message);
        }
        other => panic!("expected parse error, got {}", other),
    }
}

/// Out-of-range immediates are rejected.
#[test]
fn rejects_wide_immediates() {
    assert!(loader::parse_program("add r0, r30, r29, 1024\n").is_err());
    assert!(loader::parse_program("add r0, r30, r29, -1025\n").is_err());
}

/// Out-of-range registers are rejected.
#[test]
fn rejects_bad_registers() {
    assert!(loader::parse_program("add r32, r0, r0, 0\n").is_err());
    assert!(loader::parse_program("add rx, r0, r0, 0\n").is_err());
}

/// Operand arity is enforced per opcode form.
#[test]
fn rejects_wrong_arity() {
    assert!(loader::parse_program("hlt r1\n").is_err());
    assert!(loader::parse_program("ifeq r0, r30\n").is_err());
    assert!(loader::parse_program("add r0, r30, r29\n").is_err());
}

// ══════════════════════════════════════════════════════════
// 3. File loading
// ══════════════════════════════════════════════════════════

/// A program file round-trips through disk.
#[test]
fn loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prog.bb");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "add r1, r30, r29, 3").unwrap();
    writeln!(file, "hlt").unwrap();
    drop(file);

    let program = loader::load_path(&path).unwrap();
    assert_eq!(program.words().len(), 2);
}

/// A missing file is an I/O error.
#[test]
fn missing_file_is_io_error() {
    let err = loader::load_path("/nonexistent/prog.bb").unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}
