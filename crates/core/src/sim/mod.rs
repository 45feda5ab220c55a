//! Program loading and the top-level run loop.

/// Program image format and text parsing.
pub mod loader;
/// Simulator construction and the bounded run loop.
pub mod simulator;

pub use self::loader::{LoadError, Program};
pub use self::simulator::{RunOutcome, Simulator};
