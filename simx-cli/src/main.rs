use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use simx_assembler::assemble;
use simx_disassembler::{disassemble, listing};
use simx_runtime::{IOHandler, ReadPolicy, VMConfig, VM};
use simx_spec::{MachineConfig, Program, StackSlot, DEFAULT_STACK_SIZE};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "simx", version, about = "Run a SIMX program image")]
struct Args {
    /// Program image to execute
    file: PathBuf,

    /// Treat FILE as assembly source
    #[arg(short, long)]
    assembly: bool,

    /// Write the assembled image to this file (--assembly)
    #[arg(short, long, requires = "assembly")]
    output: Option<PathBuf>,

    /// Do not execute the program
    #[arg(short, long)]
    no_exec: bool,

    /// Print a disassembly listing instead of running
    #[arg(short, long)]
    disassemble: bool,

    /// Print the decoded instruction fields before running
    #[arg(long)]
    dump: bool,

    /// Stop with an error after this many instructions
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Log every executed instruction
    #[arg(long)]
    trace: bool,

    /// Store single bytes on the stack for call/ret/pushl/popl
    #[arg(long)]
    byte_stack: bool,

    /// What readr does with malformed or missing input
    #[arg(long, value_enum, default_value_t = ReadPolicyArg::Fatal)]
    read_policy: ReadPolicyArg,

    /// Write the execution result and trace (bincode) to this file
    #[arg(long)]
    trace_out: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReadPolicyArg {
    /// Stop with an error
    Fatal,
    /// Keep the register's previous value
    Keep,
    /// Store zero
    Zero,
}

impl From<ReadPolicyArg> for ReadPolicy {
    fn from(arg: ReadPolicyArg) -> Self {
        match arg {
            ReadPolicyArg::Fatal => ReadPolicy::Fatal,
            ReadPolicyArg::Keep => ReadPolicy::LeaveUnchanged,
            ReadPolicyArg::Zero => ReadPolicy::Zero,
        }
    }
}

fn init_logging(verbose: u8, trace: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let directives = if trace {
        format!("{level},simx_runtime=trace")
    } else {
        level.to_string()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(args: &Args) -> Result<Program> {
    let file = &args.file;

    if args.assembly {
        let source = fs::read_to_string(file)
            .with_context(|| format!("unable to read {}", file.display()))?;
        let program = assemble(&source).with_context(|| format!("{}", file.display()))?;
        info!(instructions = program.len(), "assembled");

        if let Some(output) = &args.output {
            fs::write(output, program.to_bytes())
                .with_context(|| format!("unable to write {}", output.display()))?;
        }
        return Ok(program);
    }

    let bytes =
        fs::read(file).with_context(|| format!("unable to open input file {}", file.display()))?;
    Program::from_bytes(&bytes).context("invalid input file")
}

fn run(args: Args) -> Result<()> {
    let program = load(&args)?;

    if args.disassemble {
        print!("{}", disassemble(&program));
        return Ok(());
    }
    if args.dump {
        print!("{}", listing(&program.decode()));
    }
    if args.no_exec {
        return Ok(());
    }

    let slot = if args.byte_stack {
        StackSlot::Byte
    } else {
        StackSlot::Word
    };
    let config = VMConfig {
        machine: MachineConfig::new(DEFAULT_STACK_SIZE, slot)?,
        max_cycles: args.max_cycles,
        trace: args.trace,
        enable_execution_trace: args.trace_out.is_some(),
    };
    let io = IOHandler::stdio().with_read_policy(args.read_policy.into());

    let mut vm = VM::new(&program, config, io)?;
    let result = vm.run()?;
    debug!(cycles = result.cycles, reason = %result.halt_reason, "finished");

    if let Some(path) = &args.trace_out {
        let encoded = bincode::serialize(&result).context("unable to encode execution trace")?;
        fs::write(path, encoded).with_context(|| format!("unable to write {}", path.display()))?;
    }

    if !result.halt_reason.is_success() {
        bail!(
            "{} after {} instructions (pc = 0x{:x})",
            result.halt_reason,
            result.cycles,
            result.pc
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            // --help and --version are not failures
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(args.verbose, args.trace);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
