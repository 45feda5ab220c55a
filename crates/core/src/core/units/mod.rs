//! Micro-architectural units shared by the execution models.

/// Multi-level LFU cache hierarchy (optional memory collaborator).
pub mod cache;
/// GShare branch predictor (predicted pipeline only).
pub mod gshare;

pub use self::cache::{CacheHierarchy, CacheLevel};
pub use self::gshare::GSharePredictor;
