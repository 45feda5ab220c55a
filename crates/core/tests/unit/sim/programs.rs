//! End-to-end program scenarios.
//!
//! The acceptance programs for the whole simulator family: Fibonacci,
//! factorial, memory-resident factorial, stack push/pop, side-channel
//! output, predictor convergence, fault surfacing, and the equivalence of
//! all three execution models on each of them.

use batbridge_core::common::SimError;
use batbridge_core::config::{Config, CoreVariant};
use batbridge_core::isa::instruction::{AsmInst, RegRef};
use batbridge_core::isa::opcode::OpCode;
use batbridge_core::sim::loader::Program;
use batbridge_core::sim::{RunOutcome, Simulator};

use crate::common::harness::{TestContext, assert_variants_agree, run_program};

fn idx(i: u8) -> RegRef {
    RegRef::Idx(i)
}

/// Iterative Fibonacci: r1 = fib-sum after 14 rounds (610).
fn fib_program() -> Vec<AsmInst> {
    vec![
        AsmInst::new(OpCode::Add, idx(0), RegRef::Zero, RegRef::Imm, 14),
        AsmInst::new(OpCode::Add, idx(1), RegRef::Zero, RegRef::Imm, 1),
        AsmInst::new(OpCode::Add, idx(2), RegRef::Zero, RegRef::Imm, 0),
        AsmInst::cond(OpCode::IfEq, idx(0), RegRef::Zero, 0),
        AsmInst::new(OpCode::Add, RegRef::Pc, RegRef::Pc, RegRef::Imm, 20),
        AsmInst::new(OpCode::Sub, idx(0), idx(0), RegRef::Imm, 1),
        AsmInst::new(OpCode::Add, idx(3), idx(1), idx(2), 0),
        AsmInst::new(OpCode::Add, idx(2), idx(1), RegRef::Zero, 0),
        AsmInst::new(OpCode::Add, idx(1), idx(3), RegRef::Zero, 0),
        AsmInst::new(OpCode::Sub, RegRef::Pc, RegRef::Pc, RegRef::Imm, 28),
        AsmInst::hlt(),
    ]
}

/// Iterative factorial: r0 = 10! at halt.
fn fact_program() -> Vec<AsmInst> {
    vec![
        AsmInst::new(OpCode::Add, idx(0), RegRef::Zero, RegRef::Imm, 1),
        AsmInst::new(OpCode::Add, idx(1), RegRef::Zero, RegRef::Imm, 10),
        AsmInst::new(OpCode::Mul, idx(0), idx(0), idx(1), 0),
        AsmInst::new(OpCode::Sub, idx(1), idx(1), RegRef::Imm, 1),
        AsmInst::cond(OpCode::IfNe, idx(1), RegRef::Zero, 0),
        AsmInst::new(OpCode::Add, RegRef::Pc, RegRef::Zero, RegRef::Imm, 8),
        AsmInst::hlt(),
    ]
}

/// Writes fact(i) to memory[256 + 4*i] for i in 0..10.
fn memory_fact_program() -> Vec<AsmInst> {
    vec![
        AsmInst::new(OpCode::Add, idx(0), RegRef::Zero, RegRef::Imm, 1),
        AsmInst::new(OpCode::Add, idx(1), RegRef::Zero, RegRef::Imm, 0),
        AsmInst::new(OpCode::Add, idx(2), RegRef::Zero, RegRef::Imm, 256),
        AsmInst::new(OpCode::St, idx(0), idx(2), idx(1), 0),
        AsmInst::new(OpCode::Add, idx(1), idx(1), RegRef::Imm, 1),
        AsmInst::new(OpCode::Mul, idx(0), idx(0), idx(1), 0),
        AsmInst::cond(OpCode::IfLt, idx(1), RegRef::Imm, 10),
        AsmInst::new(OpCode::Sub, RegRef::Pc, RegRef::Pc, RegRef::Imm, 20),
        AsmInst::hlt(),
    ]
}

/// Push then halt, per the stack discipline scenario.
fn push_program() -> Vec<AsmInst> {
    vec![
        AsmInst::new(OpCode::Add, idx(0), RegRef::Zero, RegRef::Imm, 1000),
        AsmInst::new(OpCode::Add, idx(28), idx(0), idx(0), 0),
        AsmInst::new(OpCode::Push, idx(0), idx(28), idx(0), 0),
        AsmInst::hlt(),
    ]
}

/// Push, clobber, pop: the stack round trip restores the value and the
/// stack pointer.
fn push_pop_program() -> Vec<AsmInst> {
    vec![
        AsmInst::new(OpCode::Add, idx(0), RegRef::Zero, RegRef::Imm, 1000),
        AsmInst::new(OpCode::Add, idx(28), idx(0), idx(0), 0),
        AsmInst::new(OpCode::Push, idx(0), idx(28), idx(0), 0),
        AsmInst::new(OpCode::Add, idx(0), RegRef::Zero, RegRef::Zero, 0),
        AsmInst::new(OpCode::Pop, idx(0), idx(28), idx(0), 0),
        AsmInst::hlt(),
    ]
}

/// A loop whose back-jump is taken 999 times.
fn tight_loop_program() -> Vec<AsmInst> {
    vec![
        AsmInst::new(OpCode::Add, idx(0), RegRef::Zero, RegRef::Imm, 1000),
        AsmInst::new(OpCode::Sub, idx(0), idx(0), RegRef::Imm, 1),
        AsmInst::cond(OpCode::IfNe, idx(0), RegRef::Zero, 0),
        AsmInst::new(OpCode::Sub, RegRef::Pc, RegRef::Pc, RegRef::Imm, 12),
        AsmInst::hlt(),
    ]
}

// ══════════════════════════════════════════════════════════
// 1. Acceptance scenarios
// ══════════════════════════════════════════════════════════

/// Fibonacci(14) = 610, within 300 cycles on single-cycle and pipelined.
#[test]
fn fibonacci_scenario() {
    let program = Program::from_asm(&fib_program());
    for variant in [CoreVariant::SingleCycle, CoreVariant::Pipelined] {
        let mut config = Config::default();
        config.pipeline.variant = variant;
        let mut ctx = TestContext::with_config(&config, &program);
        match ctx.run_bounded(300) {
            RunOutcome::Halted { cycles } => assert!(cycles <= 300),
            RunOutcome::BoundReached { .. } => {
                panic!("{:?} did not converge in 300 cycles", variant)
            }
        }
        assert_eq!(ctx.reg(1), 610, "{:?}", variant);
        assert!(ctx.sim.machine.halted);
    }
}

/// Factorial(10) = 3_628_800 on every variant.
#[test]
fn factorial_scenario() {
    for variant in [CoreVariant::SingleCycle, CoreVariant::Pipelined, CoreVariant::Predicted] {
        let ctx = run_program(variant, &fact_program());
        assert_eq!(ctx.reg(0), 3_628_800, "{:?}", variant);
    }
}

/// fact(i) lands at memory[256 + 4*i] for every i in 0..10.
#[test]
fn memory_factorial_scenario() {
    let expected: [i32; 10] = [1, 1, 2, 6, 24, 120, 720, 5040, 40320, 362_880];
    for variant in [CoreVariant::SingleCycle, CoreVariant::Pipelined, CoreVariant::Predicted] {
        let mut ctx = run_program(variant, &memory_fact_program());
        for (i, &want) in expected.iter().enumerate() {
            let addr = 256 + 4 * i as u32;
            assert_eq!(ctx.mem(addr), want, "{:?} mem[{:#x}]", variant, addr);
        }
    }
}

/// Push decrements the stack pointer before storing.
#[test]
fn push_scenario() {
    for variant in [CoreVariant::SingleCycle, CoreVariant::Pipelined, CoreVariant::Predicted] {
        let mut ctx = run_program(variant, &push_program());
        assert_eq!(ctx.reg(28), 1996, "{:?}", variant);
        assert_eq!(ctx.mem(1996), 1000, "{:?}", variant);
        assert!(ctx.sim.machine.halted);
    }
}

/// Pop restores a pushed value and advances the stack pointer by 4.
#[test]
fn push_pop_round_trip() {
    for variant in [CoreVariant::SingleCycle, CoreVariant::Pipelined, CoreVariant::Predicted] {
        let ctx = run_program(variant, &push_pop_program());
        assert_eq!(ctx.reg(0), 1000, "{:?}", variant);
        assert_eq!(ctx.reg(28), 2000, "{:?}", variant);
    }
}

// ══════════════════════════════════════════════════════════
// 2. Equivalence of the execution models
// ══════════════════════════════════════════════════════════

/// All three models agree on every acceptance program.
#[test]
fn variants_agree_on_all_scenarios() {
    assert_variants_agree(&fib_program());
    assert_variants_agree(&fact_program());
    assert_variants_agree(&memory_fact_program());
    assert_variants_agree(&push_program());
    assert_variants_agree(&push_pop_program());
    assert_variants_agree(&tight_loop_program());
}

/// The canonical no-op changes nothing but the PC.
#[test]
fn nop_program_is_invariant() {
    let program = vec![
        AsmInst::new(OpCode::Add, RegRef::Zero, RegRef::Zero, RegRef::Zero, 0),
        AsmInst::new(OpCode::Add, RegRef::Zero, RegRef::Zero, RegRef::Zero, 0),
        AsmInst::hlt(),
    ];
    for variant in [CoreVariant::SingleCycle, CoreVariant::Pipelined, CoreVariant::Predicted] {
        let ctx = run_program(variant, &program);
        for r in 0..29 {
            assert_eq!(ctx.reg(r), 0, "{:?} r{}", variant, r);
        }
        assert_eq!(ctx.output(), "", "{:?}", variant);
    }
}

// ══════════════════════════════════════════════════════════
// 3. Side-channel output
// ══════════════════════════════════════════════════════════

/// Characters and hex values arrive on the sink in program order.
#[test]
fn side_channels_emit_in_order() {
    let program = vec![
        AsmInst::new(OpCode::Add, RegRef::Zero, RegRef::Zero, RegRef::Imm, 72),
        AsmInst::new(OpCode::Add, RegRef::Zero, RegRef::Zero, RegRef::Imm, 105),
        AsmInst::new(OpCode::Add, RegRef::Imm, RegRef::Zero, RegRef::Imm, 255),
        AsmInst::hlt(),
    ];
    for variant in [CoreVariant::SingleCycle, CoreVariant::Pipelined, CoreVariant::Predicted] {
        let ctx = run_program(variant, &program);
        assert_eq!(ctx.output(), "Hi0xff", "{:?}", variant);
    }
}

// ══════════════════════════════════════════════════════════
// 4. Predictor convergence
// ══════════════════════════════════════════════════════════

/// The back-jump of a tight loop converges: its target is learned and the
/// overwhelming majority of its retirements predict correctly.
#[test]
fn predictor_converges_on_tight_loop() {
    let ctx = run_program(CoreVariant::Predicted, &tight_loop_program());
    let predictor = ctx.sim.machine.predictor.as_ref().expect("predicted variant");

    // The unconditional back-jump at 12 always targets 4.
    assert_eq!(predictor.target_of(12), Some(4));

    let stats = &ctx.sim.machine.stats;
    let lookups = stats.bp_correct + stats.bp_mispredict;
    assert!(lookups >= 1998, "both loop branches retire ~1000 times");
    assert!(
        stats.bp_correct * 10 >= lookups * 9,
        "expected >=90% accuracy, got {}/{}",
        stats.bp_correct,
        lookups
    );
}

/// The predicted model beats the blind pipeline on a branch-heavy loop.
#[test]
fn prediction_saves_cycles() {
    let piped = run_program(CoreVariant::Pipelined, &tight_loop_program());
    let predicted = run_program(CoreVariant::Predicted, &tight_loop_program());
    assert!(
        predicted.sim.machine.stats.cycles < piped.sim.machine.stats.cycles,
        "predicted {} vs pipelined {}",
        predicted.sim.machine.stats.cycles,
        piped.sim.machine.stats.cycles
    );
}

// ══════════════════════════════════════════════════════════
// 5. Faults and outcomes
// ══════════════════════════════════════════════════════════

/// Division by zero surfaces as an arithmetic trap on every variant.
#[test]
fn division_by_zero_faults() {
    let program = Program::from_asm(&[
        AsmInst::new(OpCode::Add, idx(1), RegRef::Zero, RegRef::Imm, 5),
        AsmInst::new(OpCode::Div, idx(0), idx(1), RegRef::Zero, 0),
        AsmInst::hlt(),
    ]);
    for variant in [CoreVariant::SingleCycle, CoreVariant::Pipelined, CoreVariant::Predicted] {
        let mut config = Config::default();
        config.pipeline.variant = variant;
        let mut sim = Simulator::new(&program, &config);
        let err = sim.run(1000).unwrap_err();
        assert_eq!(err, SimError::ArithmeticTrap { pc: 4 }, "{:?}", variant);
    }
}

/// An encoding outside the opcode table faults with its address.
#[test]
fn unknown_opcode_faults() {
    let mut program = Program::new();
    program.push_word(batbridge_core::isa::codec::pack(0x3F, 0, 0, 0, 0));
    let mut sim = Simulator::new(&program, &Config::default());
    let err = sim.run(100).unwrap_err();
    assert_eq!(err, SimError::InvalidOpcode { code: 0x3F, pc: 0 });
}

/// Jumping into unset memory executes the zero word and halts cleanly.
#[test]
fn jump_into_unset_memory_halts() {
    let program = vec![AsmInst::new(
        OpCode::Add,
        RegRef::Pc,
        RegRef::Zero,
        RegRef::Imm,
        0x200,
    )];
    for variant in [CoreVariant::SingleCycle, CoreVariant::Pipelined, CoreVariant::Predicted] {
        let ctx = run_program(variant, &program);
        assert!(ctx.sim.machine.halted, "{:?}", variant);
    }
}

/// A never-halting program reports bound exhaustion with state preserved.
#[test]
fn bound_exhaustion_is_reported() {
    // An empty loop: jump to self forever.
    let program = Program::from_asm(&[AsmInst::new(
        OpCode::Sub,
        RegRef::Pc,
        RegRef::Pc,
        RegRef::Imm,
        4,
    )]);
    let mut sim = Simulator::new(&program, &Config::default());
    match sim.run(500).unwrap() {
        RunOutcome::BoundReached { cycles } => assert_eq!(cycles, 500),
        RunOutcome::Halted { .. } => panic!("self-loop must not halt"),
    }
    assert!(!sim.machine.halted);
}
