//! # SIMX Runtime
//!
//! Execute SIMX programs against a 17-slot register file and a
//! bounds-checked stack region.
//!
//! ## Features
//!
//! - **22 instructions**: arithmetic, byte moves, compare and branch, stack, console
//! - **Explicit machine state**: registers, flags and stack memory in one struct
//! - **Two halting paths**: `ret` on an empty stack, or running off the end
//! - **Pluggable console**: any `BufRead`/`Write` pair backs `printr`/`readr`
//!
//! ## Example
//!
//! ```rust,no_run
//! use simx_runtime::{IOHandler, VM, VMConfig};
//! use simx_spec::Program;
//!
//! let program = Program::default();
//! let mut vm = VM::new(&program, VMConfig::default(), IOHandler::stdio()).unwrap();
//! let result = vm.run().unwrap();
//! println!("Cycles: {}", result.cycles);
//! ```

pub mod error;
pub mod execute;
pub mod io;
pub mod memory;
pub mod state;
pub mod vm;

pub use error::{Result, RuntimeError};
pub use execute::{execute, fetch, Step};
pub use io::{format_register, Console, IOHandler, ReadPolicy};
pub use memory::StackMemory;
pub use state::MachineState;
pub use vm::{ExecutionResult, HaltReason, VMConfig, VM};

/// Simple execution helper
///
/// Runs a program with the default configuration, feeding `input` to
/// `readr`, and returns the result together with everything `printr` wrote.
pub fn run(program: &simx_spec::Program, input: &str) -> Result<(ExecutionResult, String)> {
    let io = IOHandler::new(input.as_bytes(), Vec::new());
    let mut vm = VM::new(program, VMConfig::default(), io)?;
    let result = vm.run()?;
    let (_, output) = vm.into_io().into_parts();
    Ok((result, String::from_utf8_lossy(&output).into_owned()))
}
