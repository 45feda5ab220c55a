//! BatBridge cycle-accurate simulator CLI.
//!
//! This binary is the single entry point for running program images. It
//! performs:
//! 1. **Program load:** Parse a textual program image (assembler syntax or
//!    raw words) into memory.
//! 2. **Model selection:** Run the single-cycle, pipelined, or predicted
//!    execution model, from flags or a JSON config file.
//! 3. **Reporting:** Exit 0 on halt, 1 on a fatal fault, 2 on cycle-bound
//!    exhaustion; optionally print run statistics.

use clap::{Parser, Subcommand, ValueEnum};
use std::process;

use batbridge_core::config::{Config, CoreVariant};
use batbridge_core::sim::{RunOutcome, Simulator, loader};

#[derive(Parser, Debug)]
#[command(
    name = "bbsim",
    author,
    version,
    about = "BatBridge cycle-accurate simulator",
    long_about = "Run a BatBridge program image on one of three execution models.\n\n\
        Examples:\n  \
        bbsim run -f demos/fib.bb\n  \
        bbsim run -f demos/fact.bb --variant predicted --stats\n  \
        bbsim run -f demos/fib.bb --config sim.json --trace"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program image until it halts or the cycle bound is reached.
    Run {
        /// Program image to execute.
        #[arg(short, long)]
        file: String,

        /// Execution model.
        #[arg(long, value_enum)]
        variant: Option<Variant>,

        /// Cycle bound override.
        #[arg(long)]
        bound: Option<u64>,

        /// JSON configuration file (flags override its settings).
        #[arg(long)]
        config: Option<String>,

        /// Emit per-stage trace lines on stderr.
        #[arg(long)]
        trace: bool,

        /// Print run statistics on exit.
        #[arg(long)]
        stats: bool,
    },
}

/// Execution model flag values.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Variant {
    /// One instruction per step.
    Single,
    /// Four-deep pipeline with hazard stalls and branch flush.
    Pipelined,
    /// Pipelined plus a GShare branch predictor.
    Predicted,
}

impl From<Variant> for CoreVariant {
    fn from(v: Variant) -> CoreVariant {
        match v {
            Variant::Single => CoreVariant::SingleCycle,
            Variant::Pipelined => CoreVariant::Pipelined,
            Variant::Predicted => CoreVariant::Predicted,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            file,
            variant,
            bound,
            config,
            trace,
            stats,
        } => cmd_run(file, variant, bound, config, trace, stats),
    }
}

/// Loads the program, applies flag overrides to the config, and loops on
/// `step` until halt, fault, or bound exhaustion.
fn cmd_run(
    file: String,
    variant: Option<Variant>,
    bound: Option<u64>,
    config_path: Option<String>,
    trace: bool,
    stats: bool,
) {
    let mut config = match config_path {
        Some(path) => {
            let src = std::fs::read_to_string(&path).unwrap_or_else(|e| {
                eprintln!("error: could not read config '{}': {}", path, e);
                process::exit(1);
            });
            Config::from_json(&src).unwrap_or_else(|e| {
                eprintln!("error: bad config '{}': {}", path, e);
                process::exit(1);
            })
        }
        None => Config::default(),
    };
    if let Some(v) = variant {
        config.pipeline.variant = v.into();
    }
    if let Some(b) = bound {
        config.general.cycle_bound = b;
    }
    if trace {
        config.general.trace = true;
    }

    let program = loader::load_path(&file).unwrap_or_else(|e| {
        eprintln!("error: could not load '{}': {}", file, e);
        process::exit(1);
    });

    let mut sim = Simulator::new(&program, &config);
    let outcome = sim.run(config.general.cycle_bound);

    match outcome {
        Ok(RunOutcome::Halted { cycles }) => {
            if stats {
                sim.machine.stats.print();
            }
            eprintln!("[*] halted after {} cycles", cycles);
        }
        Ok(RunOutcome::BoundReached { cycles }) => {
            if stats {
                sim.machine.stats.print();
            }
            eprintln!("[!] cycle bound reached ({} cycles)", cycles);
            process::exit(2);
        }
        Err(fault) => {
            eprintln!("\n[!] FATAL FAULT: {}", fault);
            sim.machine.dump_state();
            process::exit(1);
        }
    }
}
