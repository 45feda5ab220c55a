//! Pipeline latch structures for inter-stage communication.
//!
//! Each latch is a named slot on the machine state, carrying one stage's
//! output to the next step's consumer. The pipelined drivers run consumers
//! before producers within a step, so a slot written this step is read next
//! step, exactly like a hardware latch between clock edges.
//!
//! Latches are strictly single-producer/single-consumer per cycle; an empty
//! slot is a bubble.

use std::collections::VecDeque;

use crate::isa::instruction::Inst;

/// Output of the fetch stage: the raw word plus its addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchEntry {
    /// The undecoded instruction word.
    pub word: u32,
    /// Address the word was fetched from.
    pub pc: u32,
    /// Next-fetch address; `pc + 4` unless the predictor redirected.
    pub npc: u32,
}

/// Destination class of a writeback command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dst {
    /// A register write; `addr` is the register index. Index 31 is a
    /// branch, 30 and 29 are the output side channels.
    Registers,
    /// A memory store; `addr` is the word address.
    Memory,
    /// Machine halt; `addr` and `val` are meaningless.
    Halt,
}

/// The single writeback command an execute stage may have in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WbCmd {
    pub dst: Dst,
    pub addr: u32,
    pub val: i32,
    /// Address of the instruction that produced this command.
    pub pc: u32,
    /// Next-fetch address the instruction observed; branches compare their
    /// resolved target against this to detect mispredictions.
    pub npc: u32,
}

/// The full latch set carried on the machine state.
#[derive(Default)]
pub struct Latches {
    /// Fetch output, consumed by decode.
    pub fetch: Option<FetchEntry>,
    /// Pending micro-ops from macro expansion, drained one per cycle.
    pub decode_ops: VecDeque<Inst>,
    /// Decode output, consumed by execute.
    pub decode: Option<Inst>,
    /// Execute output, consumed by writeback.
    pub execute: Option<WbCmd>,
}
