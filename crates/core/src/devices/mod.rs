//! Output side channel.
//!
//! Writes retired to `r_ZERO` and `r_IMM` leave the machine through an
//! [`OutputSink`]: the zero register emits the value's low byte as an ASCII
//! character, the immediate register emits the signed value hex-formatted.
//! Zero-valued writes are suppressed before the sink is reached, so sinks
//! only ever see non-zero traffic.

use std::io::{self, Write};

/// Byte-oriented sink for the r29/r30 side channels.
///
/// Bytes arrive in program order; a sink is free to buffer or flush as it
/// likes.
pub trait OutputSink {
    /// Emits one character (the low byte of a write to `r_ZERO`).
    fn write_char(&mut self, b: u8);

    /// Emits a hex-formatted signed value (a write to `r_IMM`).
    ///
    /// The value is formatted directly as its 32-bit two's-complement bit
    /// pattern, without character coercion.
    fn write_hex(&mut self, v: i32);
}

/// Sink bound to stdout; the default for the run tool.
#[derive(Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_char(&mut self, b: u8) {
        let mut out = io::stdout().lock();
        let _ = out.write_all(&[b]);
        let _ = out.flush();
    }

    fn write_hex(&mut self, v: i32) {
        let mut out = io::stdout().lock();
        let _ = write!(out, "{:#x}", v);
        let _ = out.flush();
    }
}

/// In-memory sink for tests and embedding.
#[derive(Default)]
pub struct BufferSink {
    /// Everything emitted, in program order.
    pub output: String,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputSink for BufferSink {
    fn write_char(&mut self, b: u8) {
        self.output.push(b as char);
    }

    fn write_hex(&mut self, v: i32) {
        self.output.push_str(&format!("{:#x}", v));
    }
}
