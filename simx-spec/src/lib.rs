//! # SIMX Instruction Set
//!
//! A small, fixed, x86-flavoured instruction set executed against a
//! 17-slot register file and a 1 KB downward-growing stack.
//!
//! ## Key Features
//! - 22 operations selected by a 5-bit opcode
//! - 32-bit instruction words: `[opcode:5][first:5][second:5][imm:17]`
//! - 16 general-purpose 32-bit registers (r6 doubles as the stack pointer)
//! - A flags slot holding CF/ZF/SF/OF, written only by `cmpl`
//! - Byte-addressable stack memory, zero-initialized

pub mod config;
pub mod encoding;
pub mod error;
pub mod flags;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod register;
pub mod trace;

pub use config::{ConfigError, MachineConfig, StackSlot};
pub use error::{Result, SpecError};
pub use flags::{Condition, Flags};
pub use instruction::{Instruction, RawInstruction};
pub use opcode::Opcode;
pub use program::Program;
pub use register::{Register, FLAGS_SLOT, NUM_REGISTERS, NUM_REGISTER_SLOTS};
pub use trace::TraceRow;

/// Size of one encoded instruction in bytes
pub const INSTRUCTION_SIZE: u32 = 4;

/// Default stack region size in bytes
pub const DEFAULT_STACK_SIZE: u32 = 1024;
