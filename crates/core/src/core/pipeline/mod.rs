//! Pipeline machinery: latches, stages, hazards, and step drivers.

/// Step drivers for the three execution models.
pub mod engine;
/// Data hazard detection.
pub mod hazards;
/// Inter-stage latch types.
pub mod latches;
/// The stage functions.
pub mod stages;

pub use self::latches::{Dst, FetchEntry, Latches, WbCmd};
