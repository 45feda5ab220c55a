//! Configuration system for the BatBridge simulator.
//!
//! This module defines the configuration structures and enums used to
//! parameterize a run. It provides:
//! 1. **Defaults:** Baseline constants (cycle bound, start address, memory
//!    latency).
//! 2. **Structures:** Hierarchical config for general settings, the
//!    execution model, and the optional cache hierarchy.
//! 3. **Enums:** Execution model selection.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or built in code
//! with `Config::default()`; the CLI overlays its flags on top of either.

use serde::Deserialize;

/// Default configuration constants.
mod defaults {
    /// Default cycle bound for the run loop.
    ///
    /// Generous enough for every bundled demo program on the slowest
    /// variant; runs that reach it are reported as failures to converge.
    pub const CYCLE_BOUND: u64 = 1_000_000;

    /// Default initial fetch address.
    pub const START_PC: u32 = 0;

    /// Cycles charged when a read misses every cache level.
    ///
    /// Only meaningful when the hierarchy is enabled; an uncached memory
    /// charges nothing.
    pub const MEMORY_LATENCY: u64 = 20;
}

/// Execution model selection.
///
/// All three models produce identical architectural results; they differ in
/// cycle count and transient pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CoreVariant {
    /// One instruction fetched, executed, and retired per step.
    #[default]
    SingleCycle,
    /// Four-deep pipeline with data-hazard stalling and branch flush.
    Pipelined,
    /// The pipelined model plus a GShare branch predictor.
    Predicted,
}

impl CoreVariant {
    /// True for the models that run stages in reverse order with latches.
    pub fn is_pipelined(self) -> bool {
        !matches!(self, CoreVariant::SingleCycle)
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use batbridge_core::config::{Config, CoreVariant};
///
/// let json = r#"{
///     "general": { "trace": false, "cycle_bound": 5000 },
///     "pipeline": { "variant": "Predicted" },
///     "cache": {
///         "memory_latency": 20,
///         "levels": [
///             { "capacity": 64, "latency": 1 },
///             { "capacity": 512, "latency": 4 }
///         ]
///     }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.pipeline.variant, CoreVariant::Predicted);
/// assert_eq!(config.general.cycle_bound, 5000);
/// assert_eq!(config.cache.levels.len(), 2);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General run settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Execution model selection.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Optional cache hierarchy.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Parses a configuration from JSON.
    pub fn from_json(src: &str) -> Result<Config, serde_json::Error> {
        serde_json::from_str(src)
    }
}

/// General run settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Enable per-stage trace lines on stderr.
    #[serde(default)]
    pub trace: bool,

    /// Cycle bound for the run loop.
    #[serde(default = "GeneralConfig::default_cycle_bound")]
    pub cycle_bound: u64,

    /// Initial fetch address.
    #[serde(default = "GeneralConfig::default_start_pc")]
    pub start_pc: u32,
}

impl GeneralConfig {
    fn default_cycle_bound() -> u64 {
        defaults::CYCLE_BOUND
    }

    fn default_start_pc() -> u32 {
        defaults::START_PC
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            cycle_bound: defaults::CYCLE_BOUND,
            start_pc: defaults::START_PC,
        }
    }
}

/// Execution model configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineConfig {
    /// Which execution model to run.
    #[serde(default)]
    pub variant: CoreVariant,
}

/// Cache hierarchy configuration.
///
/// An empty level list disables the hierarchy entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Cycles charged when a read misses every level.
    #[serde(default = "CacheConfig::default_memory_latency")]
    pub memory_latency: u64,

    /// Cache levels, nearest first.
    #[serde(default)]
    pub levels: Vec<CacheLevelConfig>,
}

impl CacheConfig {
    fn default_memory_latency() -> u64 {
        defaults::MEMORY_LATENCY
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_latency: defaults::MEMORY_LATENCY,
            levels: Vec::new(),
        }
    }
}

/// A single cache level.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheLevelConfig {
    /// Maximum resident entries before LFU eviction.
    pub capacity: usize,
    /// Cycles charged for probing this level.
    pub latency: u64,
}
