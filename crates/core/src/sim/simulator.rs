//! Simulator: a machine plus its execution model and run loop.

use crate::common::error::SimError;
use crate::config::{Config, CoreVariant};
use crate::core::machine::Machine;
use crate::core::pipeline::engine;
use crate::devices::OutputSink;
use crate::sim::loader::Program;

/// How a bounded run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// A halt command retired within the bound.
    Halted { cycles: u64 },
    /// The cycle bound was reached first; the machine state is preserved.
    /// Test oracles treat this as a failure to converge.
    BoundReached { cycles: u64 },
}

/// Top-level simulator: machine state plus the selected execution model.
pub struct Simulator {
    /// The machine being stepped.
    pub machine: Machine,
    variant: CoreVariant,
}

impl Simulator {
    /// Builds a simulator with the program installed and a stdout sink.
    pub fn new(program: &Program, config: &Config) -> Self {
        let mut machine = Machine::new(config);
        program.install(&mut machine.mem);
        Self {
            machine,
            variant: config.pipeline.variant,
        }
    }

    /// Builds a simulator with a caller-supplied output sink.
    pub fn with_sink(program: &Program, config: &Config, sink: Box<dyn OutputSink>) -> Self {
        let mut machine = Machine::with_sink(config, sink);
        program.install(&mut machine.mem);
        Self {
            machine,
            variant: config.pipeline.variant,
        }
    }

    /// The execution model this simulator runs.
    pub fn variant(&self) -> CoreVariant {
        self.variant
    }

    /// Advances the machine by one clock edge.
    pub fn step(&mut self) -> Result<(), SimError> {
        engine::step(&mut self.machine, self.variant)
    }

    /// Steps until the machine halts or `bound` cycles have elapsed.
    ///
    /// Fatal faults stop the loop immediately with the machine state
    /// preserved for diagnosis.
    pub fn run(&mut self, bound: u64) -> Result<RunOutcome, SimError> {
        loop {
            if self.machine.halted {
                self.machine.sync_stats();
                return Ok(RunOutcome::Halted {
                    cycles: self.machine.stats.cycles,
                });
            }
            if self.machine.stats.cycles >= bound {
                self.machine.sync_stats();
                return Ok(RunOutcome::BoundReached {
                    cycles: self.machine.stats.cycles,
                });
            }
            self.step()?;
        }
    }
}
