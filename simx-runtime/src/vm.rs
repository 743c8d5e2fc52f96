//! Virtual Machine for SIMX

use crate::error::Result;
use crate::execute::{execute, fetch, Step};
use crate::io::Console;
use crate::state::MachineState;
use serde::{Deserialize, Serialize};
use simx_spec::{
    Instruction, MachineConfig, Program, RawInstruction, TraceRow, INSTRUCTION_SIZE,
    NUM_REGISTER_SLOTS,
};
use tracing::{debug, trace};

/// VM configuration
#[derive(Debug, Clone, Default)]
pub struct VMConfig {
    /// Stack size and slot width
    pub machine: MachineConfig,

    /// Maximum number of instructions to execute; `None` runs until halt
    pub max_cycles: Option<u64>,

    /// Log every executed instruction at `trace` level
    pub trace: bool,

    /// Record a [`TraceRow`] before every executed instruction
    pub enable_execution_trace: bool,
}

/// Why the VM stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HaltReason {
    /// `ret` executed with an empty stack
    Return,
    /// The program counter reached the end of the instruction stream
    EndOfProgram,
    /// `max_cycles` instructions were executed without halting
    CycleLimit,
}

impl HaltReason {
    /// Whether this halt counts as successful termination
    pub fn is_success(&self) -> bool {
        !matches!(self, HaltReason::CycleLimit)
    }
}

impl std::fmt::Display for HaltReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HaltReason::Return => write!(f, "ret on empty stack"),
            HaltReason::EndOfProgram => write!(f, "end of program"),
            HaltReason::CycleLimit => write!(f, "cycle limit reached"),
        }
    }
}

/// Execution result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Number of instructions executed
    pub cycles: u64,

    /// Reason for halting
    pub halt_reason: HaltReason,

    /// Program counter at halt
    pub pc: u32,

    /// Final register file, flags packed into slot 16
    pub registers: [i32; NUM_REGISTER_SLOTS],

    /// Execution trace (if enabled)
    pub execution_trace: Vec<TraceRow>,
}

/// SIMX Virtual Machine
pub struct VM<C: Console> {
    /// Encoded words, kept for trace rows
    code: Vec<u32>,

    /// Decoded fields, one per word
    instructions: Vec<RawInstruction>,

    /// Registers, flags and stack
    state: MachineState,

    /// Program counter
    pc: u32,

    /// Instructions executed so far
    cycles: u64,

    /// Console for printr/readr
    io: C,

    config: VMConfig,

    halt_reason: Option<HaltReason>,

    execution_trace: Vec<TraceRow>,
}

impl<C: Console> VM<C> {
    /// Create a new VM, validating the machine configuration
    pub fn new(program: &Program, config: VMConfig, io: C) -> Result<Self> {
        config.machine.validate()?;

        debug!(
            instructions = program.len(),
            hash = %program.hash_hex(),
            stack_size = config.machine.stack_size,
            "loading program"
        );

        Ok(Self {
            code: program.code.clone(),
            instructions: program.decode(),
            state: MachineState::new(config.machine),
            pc: 0,
            cycles: 0,
            io,
            config,
            halt_reason: None,
            execution_trace: Vec::new(),
        })
    }

    /// Program counter one past the last instruction
    fn end_pc(&self) -> u32 {
        (self.instructions.len() as u32).wrapping_mul(INSTRUCTION_SIZE)
    }

    /// Run until halt
    pub fn run(&mut self) -> Result<ExecutionResult> {
        let outcome = self.run_loop();
        // Deliver whatever printr produced, even on a fatal error
        let flushed = self.io.flush();
        let halt_reason = outcome?;
        flushed?;

        debug!(cycles = self.cycles, pc = self.pc, reason = %halt_reason, "halted");

        Ok(ExecutionResult {
            cycles: self.cycles,
            halt_reason,
            pc: self.pc,
            registers: self.state.register_file(),
            execution_trace: std::mem::take(&mut self.execution_trace),
        })
    }

    fn run_loop(&mut self) -> Result<HaltReason> {
        loop {
            if let Some(reason) = self.halt_reason {
                return Ok(reason);
            }

            if self.pc == self.end_pc() {
                self.halt_reason = Some(HaltReason::EndOfProgram);
                continue;
            }

            if let Some(max) = self.config.max_cycles {
                if self.cycles >= max {
                    self.halt_reason = Some(HaltReason::CycleLimit);
                    continue;
                }
            }

            self.step()?;
        }
    }

    /// Execute exactly one instruction; does nothing once the VM has halted
    pub fn step(&mut self) -> Result<()> {
        if self.halt_reason.is_some() {
            return Ok(());
        }
        if self.pc == self.end_pc() {
            self.halt_reason = Some(HaltReason::EndOfProgram);
            return Ok(());
        }

        if self.config.trace || self.config.enable_execution_trace {
            self.record()?;
        }

        match execute(self.pc, &self.instructions, &mut self.state, &mut self.io) {
            Ok(Step::Continue(next)) => self.pc = next,
            Ok(Step::Exit) => self.halt_reason = Some(HaltReason::Return),
            Err(err) => {
                debug!(cycle = self.cycles, pc = self.pc, error = %err, "fatal error");
                return Err(err);
            }
        }
        self.cycles += 1;

        Ok(())
    }

    /// Log and record the state before the instruction at `pc` runs
    fn record(&mut self) -> Result<()> {
        let raw = fetch(self.pc, &self.instructions)?;
        let word = self.code[(self.pc / INSTRUCTION_SIZE) as usize];

        if self.config.trace {
            match Instruction::from_raw(raw) {
                Ok(instr) => trace!(cycle = self.cycles, pc = self.pc, "{}", instr),
                Err(_) => trace!(cycle = self.cycles, pc = self.pc, "{:#010x}", word),
            }
        }

        if self.config.enable_execution_trace {
            self.execution_trace.push(TraceRow::new(
                self.cycles,
                self.pc,
                word,
                self.state.registers,
                self.state.flags,
            ));
        }

        Ok(())
    }

    pub fn pc(&self) -> u32 {
        self.pc
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.halt_reason
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    pub fn io(&self) -> &C {
        &self.io
    }

    pub fn into_io(self) -> C {
        self.io
    }
}
