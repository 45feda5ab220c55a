use std::cell::RefCell;
use std::rc::Rc;

use batbridge_core::config::{Config, CoreVariant};
use batbridge_core::isa::AsmInst;
use batbridge_core::sim::loader::Program;
use batbridge_core::sim::{RunOutcome, Simulator};

use crate::common::mocks::SharedSink;

/// Default cycle bound for harness runs; far above any test program.
pub const DEFAULT_BOUND: u64 = 100_000;

pub struct TestContext {
    pub sim: Simulator,
    output: Rc<RefCell<String>>,
}

impl TestContext {
    /// Builds a simulator for `variant` with `insts` assembled at address 0
    /// and an in-memory output sink.
    pub fn new(variant: CoreVariant, insts: &[AsmInst]) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut config = Config::default();
        config.pipeline.variant = variant;

        Self::with_config(&config, &Program::from_asm(insts))
    }

    /// Builds a simulator from an explicit config and program image.
    pub fn with_config(config: &Config, program: &Program) -> Self {
        let output = Rc::new(RefCell::new(String::new()));
        let sink = SharedSink::new(Rc::clone(&output));
        let sim = Simulator::with_sink(program, config, Box::new(sink));
        Self { sim, output }
    }

    /// Runs to halt within the default bound, panicking on faults or
    /// non-convergence.
    pub fn run_to_halt(&mut self) -> u64 {
        match self.sim.run(DEFAULT_BOUND) {
            Ok(RunOutcome::Halted { cycles }) => cycles,
            Ok(RunOutcome::BoundReached { cycles }) => {
                panic!("program failed to converge within {} cycles", cycles)
            }
            Err(fault) => panic!("fatal fault: {}", fault),
        }
    }

    /// Runs with an explicit bound, returning the raw outcome.
    pub fn run_bounded(&mut self, bound: u64) -> RunOutcome {
        self.sim.run(bound).expect("fatal fault")
    }

    /// Reads a register of the finished machine.
    pub fn reg(&self, idx: usize) -> i32 {
        self.sim.machine.regs.read(idx)
    }

    /// Reads a memory word of the finished machine.
    pub fn mem(&mut self, addr: u32) -> i32 {
        self.sim.machine.mem.read(addr)
    }

    /// Everything the program emitted on the output side channels.
    pub fn output(&self) -> String {
        self.output.borrow().clone()
    }
}

/// Runs `insts` to halt on one variant and returns the context.
pub fn run_program(variant: CoreVariant, insts: &[AsmInst]) -> TestContext {
    let mut ctx = TestContext::new(variant, insts);
    ctx.run_to_halt();
    ctx
}

/// Asserts that all three execution models agree on the architecturally
/// observable result of `insts`: the general registers r0..r28, every
/// memory word either variant touched, and the side-channel output.
pub fn assert_variants_agree(insts: &[AsmInst]) {
    let single = run_program(CoreVariant::SingleCycle, insts);
    for variant in [CoreVariant::Pipelined, CoreVariant::Predicted] {
        let other = run_program(variant, insts);
        for r in 0..29 {
            assert_eq!(
                single.reg(r),
                other.reg(r),
                "r{} differs between SingleCycle and {:?}",
                r,
                variant
            );
        }
        let mut addrs: Vec<u32> = single
            .sim
            .machine
            .mem
            .image()
            .keys()
            .chain(other.sim.machine.mem.image().keys())
            .copied()
            .collect();
        addrs.sort_unstable();
        addrs.dedup();
        for addr in addrs {
            assert_eq!(
                single.sim.machine.mem.image().get(&addr).copied().unwrap_or(0),
                other.sim.machine.mem.image().get(&addr).copied().unwrap_or(0),
                "mem[{:#x}] differs between SingleCycle and {:?}",
                addr,
                variant
            );
        }
        assert_eq!(
            single.output(),
            other.output(),
            "side-channel output differs between SingleCycle and {:?}",
            variant
        );
    }
}
