use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use libls8::{
    debugger::TraceDebugger,
    device::FileOutput,
    load::read_program,
    vm::{StopReason, Vm},
};
use log::info;

/// Run an LS-8 program
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Program file: one binary byte per line, `#` starts a comment
    program: PathBuf,

    /// Print a trace line to stderr before every instruction
    #[arg(long)]
    trace: bool,

    /// With --trace, also print what each instruction changed
    #[arg(long, requires = "trace")]
    verbose: bool,

    /// Give up after this many instructions
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Write PRN output to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let program = read_program(&args.program)
        .with_context(|| format!("Couldn't load {}", args.program.display()))?;

    let mut vm = Vm::empty();
    vm.load(&program)?;
    info!("Loaded {} bytes from {}", program.len(), args.program.display());

    if let Some(path) = &args.output {
        let output = FileOutput::new(path)
            .with_context(|| format!("Couldn't open {}", path.display()))?;
        vm.set_output(Box::new(output));
    }

    if args.trace {
        let debugger = if args.verbose {
            TraceDebugger::verbose()
        } else {
            TraceDebugger::new()
        };
        vm.debugger = Some(Box::new(debugger));
    }

    match args.max_cycles {
        Some(max_cycles) => {
            if vm.run_until(max_cycles)? == StopReason::CycleLimit {
                bail!("Stopped after {} cycles without halting", max_cycles);
            }
        }
        None => vm.run()?,
    }

    Ok(())
}
